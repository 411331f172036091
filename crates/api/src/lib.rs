// Path: crates/api/src/lib.rs

//! # Agora API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure panic-free and
//! well-documented code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Agora API
//!
//! Core traits and interfaces for the Agora governance engine. This crate
//! defines the stable contract between the engine and its collaborators: the
//! key-value state, balance custody, the voting-power source, proposal
//! content handlers, and the block lifecycle.

/// Defines the `BankKeeper` trait for balance custody.
pub mod bank;
/// Defines the `ProposalHandler` trait for content validation and execution.
pub mod governance;
/// Defines traits for services that hook into the block processing lifecycle.
pub mod lifecycle;
/// Defines the `VotingPowerSource` trait consulted at tally time.
pub mod staking;
/// Core traits for state management, including `StateAccess` and `StateOverlay`.
pub mod state;
/// Defines the deterministic execution context of a transaction.
pub mod transaction;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::bank::BankKeeper;
    pub use crate::governance::ProposalHandler;
    pub use crate::lifecycle::OnEndBlock;
    pub use crate::staking::VotingPowerSource;
    pub use crate::state::{StateAccess, StateOverlay};
    pub use crate::transaction::context::TxContext;
}
