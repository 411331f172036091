// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Agora Services
//!
//! The proposal lifecycle and weighted-tally engine (`governance`), plus
//! state-backed reference implementations of its collaborators: balance
//! custody (`bank`) and validator-set voting power (`staking`).

pub mod bank;
pub mod governance;
pub mod staking;
