//! Batch applier — commits planned patches through the store's batched write.
//!
//! One scan (a collection, or one parent's sub-collection) becomes one
//! commit, split only when it exceeds `run.max_batch_writes`. A failed commit
//! is returned as-is; batches committed before it stay committed.

use docfix_core::config::RunConfig;
use docfix_core::Patch;
use docfix_store::{CollectionPath, DocumentStore, StoreError, WriteBatch};

/// Applies patches for one scan at a time.
pub struct BatchApplier<'s, S> {
    store: &'s S,
    max_batch_writes: usize,
    dry_run: bool,
}

impl<'s, S: DocumentStore> BatchApplier<'s, S> {
    pub fn new(store: &'s S, run: &RunConfig) -> Self {
        Self {
            store,
            max_batch_writes: run.max_batch_writes.max(1),
            dry_run: run.dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Commit `patches` to the collection at `path`. Returns the number of
    /// patches committed: zero for an empty list or a dry run.
    pub async fn apply(&self, path: &CollectionPath, patches: &[Patch]) -> Result<usize, StoreError> {
        if patches.is_empty() {
            return Ok(0);
        }
        if self.dry_run {
            tracing::info!(%path, planned = patches.len(), "dry run, batch not committed");
            return Ok(0);
        }

        let mut applied = 0;
        for chunk in patches.chunks(self.max_batch_writes) {
            self.store
                .commit(WriteBatch::new(path.clone(), chunk.to_vec()))
                .await?;
            applied += chunk.len();
        }
        Ok(applied)
    }
}
