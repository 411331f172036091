// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo
    )
)]

//! # Agora Types
//!
//! This crate is the foundational library for the Agora governance engine,
//! containing the proposal data model, the fixed-point `Decimal` used for
//! tally shares and thresholds, governance parameters, and error types.
//!
//! ## Architectural Role
//!
//! As the base crate, `agora-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This prevents circular
//! dependencies and provides a single canonical definition for shared types
//! like `Proposal`, `AccountId`, and the error enums.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::TransactionError> = std::result::Result<T, E>;

/// Application-level data structures: accounts, proposals, votes, validator sets.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Constants and builders for well-known state keys.
pub mod keys;
/// The proposal model and error types most callers need.
pub mod prelude;
/// Configuration structures for the governance service.
pub mod service_configs;
