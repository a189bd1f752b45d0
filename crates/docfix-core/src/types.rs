//! Core types for docfix-core.
//!
//! This module defines the data structures shared by every layer: the
//! schema-agnostic [`Record`] snapshot, the [`FieldShape`] view the field
//! rules match on, and the [`Patch`] the engine emits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A single document fetched from the document store.
///
/// Records are frozen snapshots: the engine only ever reads them. Changes
/// reach the store as [`Patch`] values applied by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, unique within its collection.
    pub id: String,
    /// Field name to value. Absent keys are absent fields; a JSON `null` is a
    /// present field holding null.
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Build a record from a JSON object body. Non-object bodies yield a
    /// record with no fields.
    pub fn from_body(id: impl Into<String>, body: Value) -> Self {
        let fields = match body {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }

    /// The field as a [`FieldShape`].
    pub fn shape(&self, field: &str) -> FieldShape<'_> {
        FieldShape::of(self.fields.get(field))
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// String value of `field`, if it holds a string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Apply `patch` to this snapshot, resolving server timestamps to `now`.
    ///
    /// Stores use this to materialize a commit; tests use it to check
    /// idempotence. Fields the patch does not name are left untouched.
    pub fn apply(&mut self, patch: &Patch, now: &str) {
        for (field, value) in &patch.changes {
            self.fields.insert(field.clone(), value.resolve(now));
        }
    }
}

// ---------------------------------------------------------------------------
// FieldShape
// ---------------------------------------------------------------------------

/// The runtime shape of a single field.
///
/// Every field rule matches on this exhaustively; the catch-all arm is how a
/// rule leaves an unrecognized shape untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape<'a> {
    Absent,
    Null,
    Bool(bool),
    Number(&'a serde_json::Number),
    String(&'a str),
    Sequence(&'a [Value]),
    Mapping(&'a serde_json::Map<String, Value>),
}

impl<'a> FieldShape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => FieldShape::Absent,
            Some(Value::Null) => FieldShape::Null,
            Some(Value::Bool(b)) => FieldShape::Bool(*b),
            Some(Value::Number(n)) => FieldShape::Number(n),
            Some(Value::String(s)) => FieldShape::String(s),
            Some(Value::Array(items)) => FieldShape::Sequence(items),
            Some(Value::Object(map)) => FieldShape::Mapping(map),
        }
    }

    /// Absent or null.
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldShape::Absent | FieldShape::Null)
    }

    /// Absent, null, or the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldShape::Absent | FieldShape::Null => true,
            FieldShape::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Short name of the shape for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldShape::Absent => "absent",
            FieldShape::Null => "null",
            FieldShape::Bool(_) => "boolean",
            FieldShape::Number(_) => "number",
            FieldShape::String(_) => "string",
            FieldShape::Sequence(_) => "sequence",
            FieldShape::Mapping(_) => "mapping",
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// A value written by a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchValue {
    /// A literal JSON value.
    Set(Value),
    /// The store's commit time, resolved when the batch is committed.
    ServerTimestamp,
}

impl PatchValue {
    /// Materialize the value, substituting `now` for a server timestamp.
    pub fn resolve(&self, now: &str) -> Value {
        match self {
            PatchValue::Set(v) => v.clone(),
            PatchValue::ServerTimestamp => Value::String(now.to_string()),
        }
    }
}

impl From<Value> for PatchValue {
    fn from(value: Value) -> Self {
        PatchValue::Set(value)
    }
}

/// The minimal partial update that brings one record into canonical form.
///
/// A patch always carries at least one change; see [`Patch::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub id: String,
    pub changes: BTreeMap<String, PatchValue>,
}

impl Patch {
    /// Wrap `changes` for record `id`. Returns `None` when there is nothing to
    /// change: an absent patch means the record is already canonical.
    pub fn new(id: impl Into<String>, changes: BTreeMap<String, PatchValue>) -> Option<Self> {
        if changes.is_empty() {
            None
        } else {
            Some(Self {
                id: id.into(),
                changes,
            })
        }
    }

    pub fn touches(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    /// The literal value written to `field`, if any.
    pub fn value(&self, field: &str) -> Option<&Value> {
        match self.changes.get(field) {
            Some(PatchValue::Set(v)) => Some(v),
            _ => None,
        }
    }

    /// Field names touched by this patch, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
