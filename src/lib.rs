//! docfix — idempotent repair of document-store content.
//!
//! Scans configured collections, plans the minimal patches that bring each
//! record to its canonical schema, and commits them through the store's
//! batched write. This crate holds the effectful half; the planning lives in
//! `docfix-core` and the store collaborators in `docfix-store`. Both are
//! re-exported so integration tests can import everything from here.
//!
//! # Architecture
//!
//! ```text
//! DocumentStore ──list──► Normalizer::plan ──► BatchApplier ──commit──► DocumentStore
//!                                                   │
//!                                                   └──► RunSummary
//! ```
//!
//! Everything runs sequentially on one task: fetch a collection, plan it,
//! commit it, move on.

pub mod applier;
pub mod driver;

pub use applier::BatchApplier;
pub use docfix_core as core;
pub use docfix_core::{CollectionSchema, Patch, PatchValue, Record};
pub use docfix_store as store;
pub use driver::{Repair, RunSummary, ScanReport};
