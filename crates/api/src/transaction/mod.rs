// Path: crates/api/src/transaction/mod.rs
//! The deterministic context a governance operation executes in.

pub mod context;
