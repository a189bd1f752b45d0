use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a [`DocumentStore`](crate::DocumentStore).
///
/// None of these are retried: the driver logs them and stops the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} is not a collection in the snapshot")]
    NotACollection { path: String },

    #[error("record {id:?} not found in {path}")]
    NotFound { path: String, id: String },
}
