// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Agora Test Utilities
//!
//! Assertion macros and state fixtures shared by the governance engine's tests.

pub mod assertions;
pub mod fixtures;
