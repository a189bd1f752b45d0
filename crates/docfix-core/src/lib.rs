//! docfix-core — record model and normalization engine.
//!
//! This crate is pure: it reads record snapshots and returns patches, and
//! never talks to a store.
//!
//! # Architecture
//!
//! ```text
//! Record snapshot ──► Classifier ──► Normalizer ──► Vec<Patch>
//!                                        ▲
//!                   CollectionSchema ────┘  (from Config)
//! ```
//!
//! The driver in the `docfix` crate fetches snapshots from a
//! `docfix_store::DocumentStore`, plans them here, and commits the patches.

pub mod audit;
pub mod classifier;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod ordering;
pub mod schema;
pub mod snippets;
pub mod types;

pub use error::SchemaError;
pub use normalizer::{Normalizer, PlanContext};
pub use schema::CollectionSchema;
pub use snippets::SnippetCatalog;
pub use types::{FieldShape, Patch, PatchValue, Record};
