// Path: crates/services/src/governance/router.rs
//! Routes proposal content to the handler registered for its type.

use agora_api::governance::ProposalHandler;
use agora_api::state::StateAccess;
use agora_api::transaction::context::TxContext;
use agora_types::app::ProposalContent;
use agora_types::error::{GovernanceError, TransactionError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Signaling proposals: nothing to validate beyond the basics, nothing to execute.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextProposalHandler;

impl ProposalHandler for TextProposalHandler {
    fn validate(&self, _content: &ProposalContent) -> Result<(), GovernanceError> {
        Ok(())
    }

    fn execute(
        &self,
        _state: &mut dyn StateAccess,
        _content: &ProposalContent,
        _ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        Ok(())
    }
}

/// A `ProposalHandler` that dispatches on `ProposalType::route()`.
///
/// Every content passes `ProposalContent::validate_basic` before it reaches a
/// route. Content whose route has no handler is rejected at submission.
#[derive(Clone)]
pub struct ProposalRouter {
    routes: BTreeMap<String, Arc<dyn ProposalHandler>>,
}

impl Default for ProposalRouter {
    /// A router that knows only the `text` route.
    fn default() -> Self {
        Self::empty().with_route("text", Arc::new(TextProposalHandler))
    }
}

impl ProposalRouter {
    /// A router without any routes.
    pub fn empty() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) the handler for `route`.
    pub fn with_route(mut self, route: impl Into<String>, handler: Arc<dyn ProposalHandler>) -> Self {
        self.routes.insert(route.into(), handler);
        self
    }

    /// Returns true if `route` has a handler.
    pub fn has_route(&self, route: &str) -> bool {
        self.routes.contains_key(route)
    }

    fn handler_for(&self, content: &ProposalContent) -> Result<&Arc<dyn ProposalHandler>, GovernanceError> {
        let route = content.proposal_type.route();
        self.routes
            .get(route)
            .ok_or_else(|| GovernanceError::UnknownProposalRoute(route.to_string()))
    }
}

impl ProposalHandler for ProposalRouter {
    fn validate(&self, content: &ProposalContent) -> Result<(), GovernanceError> {
        content.validate_basic()?;
        self.handler_for(content)?.validate(content)
    }

    fn execute(
        &self,
        state: &mut dyn StateAccess,
        content: &ProposalContent,
        ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        self.handler_for(content)?.execute(state, content, ctx)
    }
}
