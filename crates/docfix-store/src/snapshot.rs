//! Snapshot-file document store.
//!
//! [`SnapshotStore`] loads a JSON export into a [`MemoryStore`] and writes
//! the whole tree back after every successful `commit` or `set`. The file is
//! replaced atomically: the tree is written to a temporary file in the same
//! directory, synced, given the original file's permissions and renamed over
//! the original, so a crash mid-write never leaves a truncated snapshot.

use crate::{CollectionPath, DocumentStore, MemoryStore, StoreError, WriteBatch};
use chrono::{DateTime, Utc};
use docfix_core::Record;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A [`DocumentStore`] backed by a JSON export file.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl SnapshotStore {
    /// Open an existing snapshot file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
        let tree = serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "snapshot loaded");
        Ok(Self {
            path,
            inner: MemoryStore::from_tree(tree),
        })
    }

    /// Resolve server timestamps to `at` instead of the wall clock.
    pub fn frozen_at(mut self, at: DateTime<Utc>) -> Self {
        self.inner = self.inner.frozen_at(at);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory tree behind the file.
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let tree = self.inner.tree().await;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let text = serde_json::to_string_pretty(&tree).map_err(|e| write_err(e.into()))?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        if let Ok(meta) = tokio::fs::metadata(&self.path).await {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

impl DocumentStore for SnapshotStore {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Record>, StoreError> {
        self.inner.list(path).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.inner.commit(batch).await?;
        self.persist().await
    }

    async fn set(&self, path: &CollectionPath, record: Record) -> Result<(), StoreError> {
        self.inner.set(path, record).await?;
        self.persist().await
    }
}
