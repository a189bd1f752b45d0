//! docfix-store — document store collaborators for docfix.
//!
//! The engine in `docfix-core` never performs I/O. Everything that touches
//! records at rest goes through the [`DocumentStore`] trait:
//!
//! - [`MemoryStore`] keeps a snapshot tree in memory (tests, dry runs);
//! - [`SnapshotStore`] wraps a `MemoryStore` and persists it to a JSON export
//!   file after every write.
//!
//! # Snapshot layout
//!
//! The tree uses the common document-database export layout: top-level keys
//! are collection names, each mapping record ids to record bodies, and a body
//! may hold its sub-collections under `__collections__`:
//!
//! ```json
//! {
//!   "quizzes": {
//!     "quiz_1": {
//!       "title": "Python Basics",
//!       "__collections__": {
//!         "questions": { "q_1": { "question": "True or False: ...", "correctAnswer": true } }
//!       }
//!     }
//!   }
//! }
//! ```

mod error;
pub mod memory;
pub mod snapshot;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

use docfix_core::{Patch, Record};
use std::fmt;
use std::future::Future;

/// Key under which a record body nests its sub-collections.
pub const SUBCOLLECTIONS_KEY: &str = "__collections__";

// ---------------------------------------------------------------------------
// CollectionPath
// ---------------------------------------------------------------------------

/// Path to a collection: `lessons`, or `quizzes/quiz_1/questions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    /// Alternating collection and record segments, always odd in length.
    segments: Vec<String>,
}

impl CollectionPath {
    /// A top-level collection.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// The `name` sub-collection of record `id` in this collection.
    pub fn child(&self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.into());
        segments.push(name.into());
        Self { segments }
    }

    /// Final collection name.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// `(collection, record id)` pairs leading to this collection, then the
    /// collection itself.
    pub(crate) fn walk(&self) -> (impl Iterator<Item = (&str, &str)>, &str) {
        let (last, parents) = self
            .segments
            .split_last()
            .map(|(last, rest)| (last.as_str(), rest))
            .unwrap_or(("", &[]));
        let pairs = parents
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()));
        (pairs, last)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

// ---------------------------------------------------------------------------
// WriteBatch
// ---------------------------------------------------------------------------

/// Field-level patches committed to one collection as a single operation.
///
/// Stores commit a batch atomically: either every patch lands or none does.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBatch {
    pub path: CollectionPath,
    pub patches: Vec<Patch>,
}

impl WriteBatch {
    pub fn new(path: CollectionPath, patches: Vec<Patch>) -> Self {
        Self { path, patches }
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// The document store collaborator.
///
/// Calls are awaited one at a time by the driver; implementations need not
/// coordinate concurrent writers.
pub trait DocumentStore: Send + Sync {
    /// Every record in the collection at `path`. A collection that does not
    /// exist is empty.
    fn list(&self, path: &CollectionPath) -> impl Future<Output = Result<Vec<Record>, StoreError>> + Send;

    /// Apply every patch in `batch`, atomically.
    fn commit(&self, batch: WriteBatch) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace the full body of a record, creating it if needed. Existing
    /// sub-collections are kept.
    fn set(&self, path: &CollectionPath, record: Record) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every record in the `name` sub-collection of record `parent_id`.
    fn list_children(
        &self,
        parent: &CollectionPath,
        parent_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Record>, StoreError>> + Send {
        let path = parent.child(parent_id, name);
        async move { self.list(&path).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_paths_render_with_slashes() {
        let path = CollectionPath::root("quizzes").child("quiz_1", "questions");
        assert_eq!(path.to_string(), "quizzes/quiz_1/questions");
        assert_eq!(path.name(), "questions");

        let (pairs, last) = path.walk();
        assert_eq!(pairs.collect::<Vec<_>>(), vec![("quizzes", "quiz_1")]);
        assert_eq!(last, "questions");
    }
}
