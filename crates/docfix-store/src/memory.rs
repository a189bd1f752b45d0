//! In-memory document store over a snapshot tree.

use crate::{CollectionPath, DocumentStore, StoreError, WriteBatch, SUBCOLLECTIONS_KEY};
use chrono::{DateTime, SecondsFormat, Utc};
use docfix_core::Record;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A [`DocumentStore`] holding the whole snapshot tree in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tree: Mutex<Map<String, Value>>,
    /// Fixed commit time; `None` uses the wall clock.
    frozen_at: Option<DateTime<Utc>>,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a snapshot tree. A non-object tree yields an empty store.
    pub fn from_tree(tree: Value) -> Self {
        let tree = match tree {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            tree: Mutex::new(tree),
            ..Self::default()
        }
    }

    /// Resolve server timestamps to `at` instead of the wall clock.
    pub fn frozen_at(mut self, at: DateTime<Utc>) -> Self {
        self.frozen_at = Some(at);
        self
    }

    /// A copy of the current snapshot tree.
    pub async fn tree(&self) -> Value {
        Value::Object(self.tree.lock().await.clone())
    }

    /// Number of batches committed so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn now(&self) -> String {
        self.frozen_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl DocumentStore for MemoryStore {
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Record>, StoreError> {
        let tree = self.tree.lock().await;
        let Some(collection) = collection(&tree, path)? else {
            return Ok(Vec::new());
        };
        Ok(collection
            .iter()
            .map(|(id, body)| record_from_body(id, body))
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let now = self.now();
        let mut tree = self.tree.lock().await;
        let collection = collection_mut(&mut tree, &batch.path, false)?;

        // Check every target first so a failed batch leaves no trace.
        for patch in &batch.patches {
            if !matches!(collection.get(&patch.id), Some(Value::Object(_))) {
                return Err(StoreError::NotFound {
                    path: batch.path.to_string(),
                    id: patch.id.clone(),
                });
            }
        }

        for patch in &batch.patches {
            if let Some(Value::Object(body)) = collection.get_mut(&patch.id) {
                for (field, value) in &patch.changes {
                    body.insert(field.clone(), value.resolve(&now));
                }
            }
        }

        self.commits.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %batch.path, writes = batch.len(), "batch committed");
        Ok(())
    }

    async fn set(&self, path: &CollectionPath, record: Record) -> Result<(), StoreError> {
        let mut tree = self.tree.lock().await;
        let collection = collection_mut(&mut tree, path, true)?;

        let nested = collection
            .get_mut(&record.id)
            .and_then(Value::as_object_mut)
            .and_then(|body| body.remove(SUBCOLLECTIONS_KEY));

        let mut body: Map<String, Value> = record.fields.into_iter().collect();
        body.remove(SUBCOLLECTIONS_KEY);
        if let Some(nested) = nested {
            body.insert(SUBCOLLECTIONS_KEY.to_string(), nested);
        }
        collection.insert(record.id, Value::Object(body));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree navigation
// ---------------------------------------------------------------------------

fn record_from_body(id: &str, body: &Value) -> Record {
    let mut record = Record::from_body(id, body.clone());
    record.fields.remove(SUBCOLLECTIONS_KEY);
    record
}

fn not_a_collection(path: &CollectionPath) -> StoreError {
    StoreError::NotACollection {
        path: path.to_string(),
    }
}

/// The collection at `path`, or `None` when some segment does not exist.
fn collection<'t>(
    tree: &'t Map<String, Value>,
    path: &CollectionPath,
) -> Result<Option<&'t Map<String, Value>>, StoreError> {
    let (pairs, last) = path.walk();
    let mut level = tree;
    for (name, id) in pairs {
        let next = level
            .get(name)
            .and_then(|c| c.get(id))
            .and_then(|record| record.get(SUBCOLLECTIONS_KEY));
        match next {
            Some(Value::Object(map)) => level = map,
            Some(_) => return Err(not_a_collection(path)),
            None => return Ok(None),
        }
    }
    match level.get(last) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(not_a_collection(path)),
        None => Ok(None),
    }
}

/// The collection at `path`, created along the way when `create` is set.
///
/// Without `create`, any missing segment is an error.
fn collection_mut<'t>(
    tree: &'t mut Map<String, Value>,
    path: &CollectionPath,
    create: bool,
) -> Result<&'t mut Map<String, Value>, StoreError> {
    let (pairs, last) = path.walk();
    let mut level = tree;
    for (name, id) in pairs {
        let records = object_entry(level, name, create).ok_or_else(|| not_a_collection(path))?;
        let record = object_entry(records, id, create).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
            id: id.to_string(),
        })?;
        level = object_entry(record, SUBCOLLECTIONS_KEY, create)
            .ok_or_else(|| not_a_collection(path))?;
    }
    object_entry(level, last, create).ok_or_else(|| not_a_collection(path))
}

/// `map[key]` as an object. A missing key is inserted as `{}` when `create`
/// is set; an existing non-object yields `None`.
fn object_entry<'m>(
    map: &'m mut Map<String, Value>,
    key: &str,
    create: bool,
) -> Option<&'m mut Map<String, Value>> {
    if !map.contains_key(key) {
        if !create {
            return None;
        }
        map.insert(key.to_string(), Value::Object(Map::new()));
    }
    map.get_mut(key).and_then(Value::as_object_mut)
}
