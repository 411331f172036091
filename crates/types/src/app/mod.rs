// Path: crates/types/src/app/mod.rs
//! Core application-level data structures for the governance engine.

/// Data structures related to consensus, such as the canonical validator set.
pub mod consensus;
/// The deterministic fixed-point `Decimal` used for reported shares.
pub mod decimal;
/// Proposals, deposits, votes, and tally results.
pub mod governance;
/// The canonical `AccountId` and module account derivation.
pub mod identity;
/// Exact rational thresholds for quorum, pass, and veto.
pub mod threshold;

pub use consensus::*;
pub use decimal::Decimal;
pub use governance::*;
pub use identity::AccountId;
pub use threshold::Threshold;
