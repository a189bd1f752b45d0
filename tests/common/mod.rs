//! Shared test utilities for docfix integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every helper is deterministic: stores built here freeze
//! server timestamps at [`FROZEN_AT`].

pub mod assertions;
pub mod builders;
pub mod flaky_store;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use flaky_store::FlakyStore;
