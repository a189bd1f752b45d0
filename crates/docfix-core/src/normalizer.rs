//! Normalizer — computes the minimal patch that brings a record to canonical
//! form under a [`CollectionSchema`].
//!
//! Planning is pure: [`Normalizer::plan`] takes a snapshot of sibling records
//! and returns the patches, leaving the commit to the caller. Rules run in a
//! fixed order (migrations → boolean category → default fills → snippet
//! backfill → ordering) and the first rule to claim a field wins.
//!
//! Every rule is non-destructive and idempotent:
//!
//! - a field in canonical form is never touched;
//! - a field whose shape a rule does not recognize is left as-is;
//! - applying a plan and planning again yields nothing.

use crate::classifier;
use crate::ordering;
use crate::schema::{
    BooleanCategory, CollectionSchema, DefaultRule, Migration, SnippetRule, FALSE_LITERAL,
    TRUE_LITERAL,
};
use crate::snippets::SnippetCatalog;
use crate::types::{FieldShape, Patch, PatchValue, Record};
use serde_json::{json, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// What the planner knows beyond the records themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanContext<'a> {
    /// Parent record, for sub-collection scans.
    pub parent: Option<&'a Record>,
    /// Snippet catalog for the backfill rule.
    pub snippets: Option<&'a SnippetCatalog>,
}

impl<'a> PlanContext<'a> {
    pub fn with_parent(mut self, parent: &'a Record) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_snippets(mut self, snippets: &'a SnippetCatalog) -> Self {
        self.snippets = Some(snippets);
        self
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Plans patches for one collection scan.
pub struct Normalizer<'a> {
    schema: &'a CollectionSchema,
}

impl<'a> Normalizer<'a> {
    pub fn new(schema: &'a CollectionSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &CollectionSchema {
        self.schema
    }

    /// Patches for every sibling that is not yet canonical, in input order.
    pub fn plan(&self, siblings: &[Record], ctx: PlanContext<'_>) -> Vec<Patch> {
        let positions = match &self.schema.ordering {
            Some(rule) => ordering::assign_positions(siblings, &rule.field),
            None => BTreeMap::new(),
        };

        siblings
            .iter()
            .filter_map(|record| self.normalize(record, ctx, positions.get(&record.id).copied()))
            .collect()
    }

    /// Patch for a single record, or `None` when it is already canonical.
    ///
    /// `position` is the sibling position assigned by the ordering rule; it
    /// is only written when the record lacks one.
    pub fn normalize(
        &self,
        record: &Record,
        ctx: PlanContext<'_>,
        position: Option<i64>,
    ) -> Option<Patch> {
        let mut changes = Changes::default();

        for migration in &self.schema.migrations {
            if let Some(value) = migrate(record, migration) {
                changes.claim(&migration.field, value);
            }
        }

        if let Some(category) = &self.schema.boolean {
            if classifier::is_member(record, category) {
                tracing::debug!(
                    id = %record.id,
                    signals = ?classifier::matched_signals(record, category),
                    "boolean question"
                );
                normalize_boolean(record, category, &mut changes);
            }
        }

        for rule in &self.schema.defaults {
            if let Some(value) = default_fill(record, rule) {
                changes.claim(rule.field(), value);
            }
        }

        if let (Some(rule), Some(catalog), Some(parent)) =
            (&self.schema.snippets, ctx.snippets, ctx.parent)
        {
            if let Some(snippet) = backfill_snippet(record, parent, rule, catalog) {
                changes.claim(&rule.field, json!(snippet));
            }
        }

        if let (Some(rule), Some(position)) = (&self.schema.ordering, position) {
            if record.shape(&rule.field).is_missing() {
                changes.claim(&rule.field, json!(position));
            }
        }

        Patch::new(record.id.clone(), changes.0)
    }
}

/// Field changes for one record; the first claim on a field wins.
#[derive(Default)]
struct Changes(BTreeMap<String, PatchValue>);

impl Changes {
    fn claim(&mut self, field: &str, value: impl Into<PatchValue>) {
        if let Entry::Vacant(slot) = self.0.entry(field.to_string()) {
            slot.insert(value.into());
        }
    }
}

// ---------------------------------------------------------------------------
// Boolean category
// ---------------------------------------------------------------------------

fn normalize_boolean(record: &Record, category: &BooleanCategory, changes: &mut Changes) {
    if let Some(answer) = canonical_answer(record.shape(&category.answer_field)) {
        changes.claim(&category.answer_field, answer);
    }
    if let Some(options) = canonical_options(record.shape(&category.options_field)) {
        changes.claim(&category.options_field, options);
    }
    if let Some(tag) = canonical_type(record.shape(&category.type_field), &category.type_value) {
        changes.claim(&category.type_field, tag);
    }
}

/// Canonical answer for a boolean question, when the current value is not.
///
/// Booleans are always rewritten. Strings are rewritten only when they spell
/// true/false in a different case. Anything else is left alone.
pub fn canonical_answer(shape: FieldShape<'_>) -> Option<Value> {
    match shape {
        FieldShape::Bool(b) => Some(json!(if b { TRUE_LITERAL } else { FALSE_LITERAL })),
        FieldShape::String(s) => {
            let canonical = if s.eq_ignore_ascii_case(TRUE_LITERAL) {
                TRUE_LITERAL
            } else if s.eq_ignore_ascii_case(FALSE_LITERAL) {
                FALSE_LITERAL
            } else {
                return None;
            };
            (s != canonical).then(|| json!(canonical))
        }
        FieldShape::Absent
        | FieldShape::Null
        | FieldShape::Number(_)
        | FieldShape::Sequence(_)
        | FieldShape::Mapping(_) => None,
    }
}

/// `["True", "False"]` when the current options are a two-element true/false
/// pair in some other spelling or order.
pub fn canonical_options(shape: FieldShape<'_>) -> Option<Value> {
    let FieldShape::Sequence(items) = shape else {
        return None;
    };
    if items.len() != 2 {
        return None;
    }
    let mut lowered: Vec<String> = items
        .iter()
        .map(|item| item.as_str().map(str::to_lowercase))
        .collect::<Option<_>>()?;
    lowered.sort();
    if lowered != ["false", "true"] {
        return None;
    }
    let already = items[0].as_str() == Some(TRUE_LITERAL) && items[1].as_str() == Some(FALSE_LITERAL);
    (!already).then(|| json!([TRUE_LITERAL, FALSE_LITERAL]))
}

/// The type tag, unless the field already holds exactly that string.
pub fn canonical_type(shape: FieldShape<'_>, type_value: &str) -> Option<Value> {
    match shape {
        FieldShape::String(s) if s == type_value => None,
        _ => Some(json!(type_value)),
    }
}

// ---------------------------------------------------------------------------
// General rules
// ---------------------------------------------------------------------------

/// Value to copy into `migration.field` from the first present synonym.
pub fn migrate(record: &Record, migration: &Migration) -> Option<Value> {
    if record.has(&migration.field) {
        return None;
    }
    migration
        .synonyms
        .iter()
        .filter_map(|synonym| record.fields.get(synonym))
        .find(|value| !value.is_null())
        .cloned()
}

/// Default for an absent field. Present fields are never filled, whatever
/// they hold.
pub fn default_fill(record: &Record, rule: &DefaultRule) -> Option<PatchValue> {
    if record.has(rule.field()) {
        return None;
    }
    match rule {
        DefaultRule::Literal { value, .. } => Some(PatchValue::Set(value.clone())),
        DefaultRule::ServerTimestamp { .. } => Some(PatchValue::ServerTimestamp),
        DefaultRule::Scaled { from, factor, .. } => match record.shape(from) {
            FieldShape::Number(n) => scale(n, *factor).map(PatchValue::Set),
            _ => None,
        },
    }
}

fn scale(n: &serde_json::Number, factor: f64) -> Option<Value> {
    let integral = factor.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&factor);
    if integral {
        if let Some(scaled) = n.as_i64().and_then(|i| i.checked_mul(factor as i64)) {
            return Some(Value::from(scaled));
        }
    }
    serde_json::Number::from_f64(n.as_f64()? * factor).map(Value::Number)
}

/// Snippet from the catalog when the record's snippet field is blank.
fn backfill_snippet<'c>(
    record: &Record,
    parent: &Record,
    rule: &SnippetRule,
    catalog: &'c SnippetCatalog,
) -> Option<&'c str> {
    if !record.shape(&rule.field).is_blank() {
        return None;
    }
    let title = parent.str_field(&rule.parent_title_field)?;
    let text = record.str_field(&rule.text_field)?;
    catalog.lookup(title, text, record.str_field(&rule.answer_field))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
