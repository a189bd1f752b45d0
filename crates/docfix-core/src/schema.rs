//! Canonical schemas — the per-collection repair plan.
//!
//! A [`CollectionSchema`] names a collection (optionally nested under every
//! record of a parent collection) and lists the rules that converge its
//! records to canonical form. Schemas arrive through
//! [`Config`](crate::config::Config) and are checked by
//! [`CollectionSchema::validate`] before any record is planned.

use crate::error::SchemaError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Canonical answer literal for a true boolean question.
pub const TRUE_LITERAL: &str = "True";
/// Canonical answer literal for a false boolean question.
pub const FALSE_LITERAL: &str = "False";

// ---------------------------------------------------------------------------
// CollectionSchema
// ---------------------------------------------------------------------------

/// Repair plan for one record kind.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSchema {
    /// Collection name (`lessons`), or sub-collection name (`questions`) when
    /// `parent` is set.
    pub name: String,
    /// Parent collection. When set, the schema applies to the `name`
    /// sub-collection of every record in `parent`.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub migrations: Vec<Migration>,
    #[serde(default)]
    pub boolean: Option<BooleanCategory>,
    #[serde(default)]
    pub defaults: Vec<DefaultRule>,
    #[serde(default)]
    pub snippets: Option<SnippetRule>,
    #[serde(default)]
    pub ordering: Option<OrderingRule>,
    /// Fields the audit requires to be present and non-blank.
    #[serde(default)]
    pub required: Vec<String>,
    /// Fields the audit requires to hold a sequence.
    #[serde(default)]
    pub required_sequences: Vec<String>,
}

impl CollectionSchema {
    /// An empty plan for `name`. Mostly useful in tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            migrations: Vec::new(),
            boolean: None,
            defaults: Vec::new(),
            snippets: None,
            ordering: None,
            required: Vec::new(),
            required_sequences: Vec::new(),
        }
    }

    /// `parent/*/name` for sub-collections, `name` otherwise.
    pub fn label(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{parent}/*/{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Reject plans whose rules would contradict each other.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if matches!(&self.parent, Some(p) if p.trim().is_empty()) {
            return Err(SchemaError::EmptyParent(self.name.clone()));
        }

        let mut seen = BTreeSet::new();
        for rule in &self.defaults {
            if !seen.insert(rule.field()) {
                return Err(SchemaError::DuplicateDefault {
                    collection: self.label(),
                    field: rule.field().to_string(),
                });
            }
            if let DefaultRule::Scaled { factor, .. } = rule {
                if !factor.is_finite() {
                    return Err(SchemaError::InvalidFactor {
                        collection: self.label(),
                        field: rule.field().to_string(),
                    });
                }
            }
        }

        for migration in &self.migrations {
            if migration.synonyms.iter().any(|s| s == &migration.field) {
                return Err(SchemaError::SelfSynonym {
                    collection: self.label(),
                    field: migration.field.clone(),
                });
            }
        }

        if let Some(ordering) = &self.ordering {
            if seen.contains(ordering.field.as_str()) {
                return Err(SchemaError::OrderingConflict {
                    collection: self.label(),
                    field: ordering.field.clone(),
                });
            }
        }

        if let Some(category) = &self.boolean {
            if category.option_set.is_empty() {
                return Err(SchemaError::EmptyOptionSet(self.label()));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Copy a legacy field into its canonical name when the canonical field is
/// absent. The legacy field is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Migration {
    /// Canonical field name.
    pub field: String,
    /// Legacy names, tried in order.
    pub synonyms: Vec<String>,
}

/// Fill an absent field. Presence, not truthiness, gates every variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultRule {
    /// Fixed literal value.
    Literal { field: String, value: Value },
    /// The store's commit time.
    ServerTimestamp { field: String },
    /// `from × factor`, only when `from` holds a number.
    Scaled {
        field: String,
        from: String,
        factor: f64,
    },
}

impl DefaultRule {
    pub fn field(&self) -> &str {
        match self {
            DefaultRule::Literal { field, .. }
            | DefaultRule::ServerTimestamp { field }
            | DefaultRule::Scaled { field, .. } => field,
        }
    }
}

/// Assign a deterministic sibling position to records missing one.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderingRule {
    #[serde(default = "default_order_field")]
    pub field: String,
}

fn default_order_field() -> String { "orderIndex".to_string() }

impl Default for OrderingRule {
    fn default() -> Self {
        Self {
            field: default_order_field(),
        }
    }
}

/// Category descriptor for boolean-type questions, plus the field names the
/// boolean normalizer rewrites.
#[derive(Debug, Clone, Deserialize)]
pub struct BooleanCategory {
    #[serde(default = "default_type_field")]
    pub type_field: String,
    #[serde(default = "default_type_value")]
    pub type_value: String,
    #[serde(default = "default_options_field")]
    pub options_field: String,
    #[serde(default = "default_option_set")]
    pub option_set: Vec<String>,
    #[serde(default = "default_text_field")]
    pub text_field: String,
    #[serde(default = "default_keyword")]
    pub keyword: String,
    #[serde(default = "default_answer_field")]
    pub answer_field: String,
}

fn default_type_field() -> String { "type".to_string() }
fn default_type_value() -> String { "boolean".to_string() }
fn default_options_field() -> String { "options".to_string() }
fn default_option_set() -> Vec<String> { vec![TRUE_LITERAL.to_string(), FALSE_LITERAL.to_string()] }
fn default_text_field() -> String { "question".to_string() }
fn default_keyword() -> String { "true or false".to_string() }
fn default_answer_field() -> String { "correctAnswer".to_string() }

impl Default for BooleanCategory {
    fn default() -> Self {
        Self {
            type_field: default_type_field(),
            type_value: default_type_value(),
            options_field: default_options_field(),
            option_set: default_option_set(),
            text_field: default_text_field(),
            keyword: default_keyword(),
            answer_field: default_answer_field(),
        }
    }
}

/// Field names used by the code-snippet backfill.
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetRule {
    /// Parent field holding the title the catalog is keyed by.
    #[serde(default = "default_title_field")]
    pub parent_title_field: String,
    #[serde(default = "default_text_field")]
    pub text_field: String,
    #[serde(default = "default_answer_field")]
    pub answer_field: String,
    /// Field the snippet is written to.
    #[serde(default = "default_snippet_field")]
    pub field: String,
}

fn default_title_field() -> String { "title".to_string() }
fn default_snippet_field() -> String { "codeSnippet".to_string() }

impl Default for SnippetRule {
    fn default() -> Self {
        Self {
            parent_title_field: default_title_field(),
            text_field: default_text_field(),
            answer_field: default_answer_field(),
            field: default_snippet_field(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
