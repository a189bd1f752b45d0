//! Classifier — decides whether a record belongs to a category.
//!
//! Membership is the OR of independent signals. Each signal is a plain
//! function so it can be tested on its own; [`SIGNALS`] lists them in the
//! order they are tried.
//!
//! The keyword signal matches anywhere in the text, so a question that
//! mentions "true or false" rhetorically is classified too.

use crate::schema::BooleanCategory;
use crate::types::{FieldShape, Record};
use serde_json::Value;
use std::collections::BTreeSet;

/// A single classification signal.
pub type Signal = fn(&Record, &BooleanCategory) -> bool;

/// Every signal, OR-reduced by [`is_member`].
pub const SIGNALS: &[(&str, Signal)] = &[
    ("type_tag", type_tag_signal),
    ("option_set", option_set_signal),
    ("keyword", keyword_signal),
];

/// `record[type_field]` equals the category's explicit type value.
pub fn type_tag_signal(record: &Record, category: &BooleanCategory) -> bool {
    matches!(record.shape(&category.type_field), FieldShape::String(s) if s == category.type_value)
}

/// The record's options, as a set, equal the category's option set.
///
/// Order-insensitive and case-sensitive. Non-string elements never match.
pub fn option_set_signal(record: &Record, category: &BooleanCategory) -> bool {
    let FieldShape::Sequence(items) = record.shape(&category.options_field) else {
        return false;
    };
    let Some(options) = items
        .iter()
        .map(Value::as_str)
        .collect::<Option<BTreeSet<&str>>>()
    else {
        return false;
    };
    let expected: BTreeSet<&str> = category.option_set.iter().map(String::as_str).collect();
    options == expected
}

/// The keyword appears, case-insensitively, in the record's text.
pub fn keyword_signal(record: &Record, category: &BooleanCategory) -> bool {
    if category.keyword.is_empty() {
        return false;
    }
    match record.shape(&category.text_field) {
        FieldShape::String(text) => text
            .to_lowercase()
            .contains(&category.keyword.to_lowercase()),
        _ => false,
    }
}

/// OR over [`SIGNALS`].
pub fn is_member(record: &Record, category: &BooleanCategory) -> bool {
    SIGNALS.iter().any(|(_, signal)| signal(record, category))
}

/// Names of the signals that fired, for log lines.
pub fn matched_signals(record: &Record, category: &BooleanCategory) -> Vec<&'static str> {
    SIGNALS
        .iter()
        .filter(|(_, signal)| signal(record, category))
        .map(|(name, _)| *name)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
