//! Error types for docfix-core.
//!
//! The engine itself never fails on record data: unrecognized shapes are left
//! untouched. The only errors are configuration mistakes caught before a run.

use thiserror::Error;

/// A configured [`CollectionSchema`](crate::schema::CollectionSchema) that
/// cannot be planned.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("collection schema has an empty name")]
    EmptyName,

    #[error("collection {0:?} has an empty parent name")]
    EmptyParent(String),

    #[error("{collection}: field {field:?} has more than one default")]
    DuplicateDefault { collection: String, field: String },

    #[error("{collection}: scaled default for {field:?} has a non-finite factor")]
    InvalidFactor { collection: String, field: String },

    #[error("{collection}: field {field:?} lists itself as a synonym")]
    SelfSynonym { collection: String, field: String },

    #[error("{collection}: ordering field {field:?} also has a default")]
    OrderingConflict { collection: String, field: String },

    #[error("{0}: boolean category has an empty option set")]
    EmptyOptionSet(String),

    #[error("run.max_batch_writes must be at least 1")]
    ZeroBatchSize,
}
