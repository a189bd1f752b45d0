//! Test builders — ergonomic constructors for records, schemas and stores.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, Utc};
use docfix::core::config::Config;
use docfix::core::schema::BooleanCategory;
use docfix::store::MemoryStore;
use docfix::{CollectionSchema, Patch, Record};
use docfix_core::{Normalizer, PlanContext};
use serde_json::Value;
use std::collections::BTreeMap;

/// Commit time used by every store built here.
pub const FROZEN_AT: &str = "2025-01-15T10:00:00.000Z";

pub fn frozen_at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FROZEN_AT)
        .expect("FROZEN_AT is RFC 3339")
        .with_timezone(&Utc)
}

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Record`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("q_1")
///     .field("question", "True or False: tuples are immutable")
///     .field("correctAnswer", true)
///     .build();
/// ```
pub struct RecordBuilder {
    id: String,
    fields: BTreeMap<String, Value>,
}

impl RecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn null(mut self, key: impl Into<String>) -> Self {
        self.fields.insert(key.into(), Value::Null);
        self
    }

    pub fn build(self) -> Record {
        Record {
            id: self.id,
            fields: self.fields,
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A question with text only.
pub fn question(id: &str, text: &str) -> RecordBuilder {
    RecordBuilder::new(id).field("question", text)
}

/// A question tagged boolean with the given answer value.
pub fn boolean_question(id: &str, answer: impl Into<Value>) -> Record {
    question(id, "Is Python dynamically typed?")
        .field("type", "boolean")
        .field("options", serde_json::json!(["True", "False"]))
        .field("correctAnswer", answer)
        .build()
}

/// A schema carrying only the boolean category, with default field names.
pub fn boolean_schema() -> CollectionSchema {
    let mut schema = CollectionSchema::named("questions");
    schema.boolean = Some(BooleanCategory::default());
    schema
}

/// A schema from the built-in repair plan.
pub fn default_schema(name: &str) -> CollectionSchema {
    Config::defaults()
        .collection(name)
        .unwrap_or_else(|| panic!("no built-in schema for {name:?}"))
        .clone()
}

/// Patch for a single record, without sibling ordering.
pub fn normalize(schema: &CollectionSchema, record: &Record) -> Option<Patch> {
    Normalizer::new(schema).normalize(record, PlanContext::default(), None)
}

/// Plan a whole sibling set.
pub fn plan(schema: &CollectionSchema, records: &[Record]) -> Vec<Patch> {
    Normalizer::new(schema).plan(records, PlanContext::default())
}

/// Apply patches to matching records in place, as a store would.
pub fn apply_all(records: &mut [Record], patches: &[Patch]) {
    for patch in patches {
        if let Some(record) = records.iter_mut().find(|r| r.id == patch.id) {
            record.apply(patch, FROZEN_AT);
        }
    }
}

/// A memory store over `tree` with a frozen clock.
pub fn memory_store(tree: Value) -> MemoryStore {
    MemoryStore::from_tree(tree).frozen_at(frozen_at())
}
