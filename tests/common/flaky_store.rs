//! FlakyStore — a [`DocumentStore`] wrapper whose commits start failing.
//!
//! Wraps a [`MemoryStore`] and lets the first `healthy_commits` batches
//! through; every later commit fails with [`StoreError::Write`] without
//! touching the tree. Lists and sets always pass through. Useful for checking
//! that the driver surfaces commit failures and stops the run.

use docfix::store::{CollectionPath, DocumentStore, MemoryStore, StoreError, WriteBatch};
use docfix::Record;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FlakyStore {
    inner: MemoryStore,
    healthy_commits: usize,
    attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore, healthy_commits: usize) -> Self {
        Self {
            inner,
            healthy_commits,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Commits attempted, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FlakyStore {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Record>, StoreError> {
        self.inner.list(path).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt >= self.healthy_commits {
            return Err(StoreError::Write {
                path: batch.path.to_string().into(),
                source: std::io::Error::other("backend unavailable"),
            });
        }
        self.inner.commit(batch).await
    }

    async fn set(&self, path: &CollectionPath, record: Record) -> Result<(), StoreError> {
        self.inner.set(path, record).await
    }
}
