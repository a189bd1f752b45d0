//! Domain-specific assertion macros for docfix harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* field a patch got wrong and *what* it held instead.

use docfix::{Patch, Record};

// ---------------------------------------------------------------------------
// Patch assertions
// ---------------------------------------------------------------------------

/// Assert that an `Option<Patch>` exists and writes `value` to `field`.
///
/// ```rust
/// assert_patch_sets!(patch, "correctAnswer", "True");
/// ```
#[macro_export]
macro_rules! assert_patch_sets {
    ($patch:expr, $field:expr, $value:expr) => {{
        let patch: &Option<docfix::Patch> = &$patch;
        let field: &str = $field;
        let expected = serde_json::json!($value);
        match patch {
            None => panic!(
                "assert_patch_sets! failed: no patch emitted, expected {:?} = {}",
                field, expected
            ),
            Some(patch) => match patch.value(field) {
                Some(actual) if *actual == expected => {}
                Some(actual) => panic!(
                    "assert_patch_sets! failed:\n  patch[{:?}]\n  expected: {}\n  actual:   {}",
                    field, expected, actual
                ),
                None => panic!(
                    "assert_patch_sets! failed: field {:?} not set by patch.\n  Touched: {:?}",
                    field,
                    patch.fields().collect::<Vec<_>>()
                ),
            },
        }
    }};
}

/// Assert that an `Option<Patch>` does not touch `field` (no patch at all
/// passes).
#[macro_export]
macro_rules! assert_untouched {
    ($patch:expr, $field:expr) => {{
        let patch: &Option<docfix::Patch> = &$patch;
        let field: &str = $field;
        if let Some(patch) = patch {
            if patch.touches(field) {
                panic!(
                    "assert_untouched! failed: patch for {:?} touches {:?}: {:?}",
                    patch.id, field, patch.changes[field]
                );
            }
        }
    }};
}

/// Assert that no patch was emitted.
#[macro_export]
macro_rules! assert_no_patch {
    ($patch:expr) => {{
        let patch: &Option<docfix::Patch> = &$patch;
        if let Some(patch) = patch {
            panic!(
                "assert_no_patch! failed: record {:?} was patched: {:?}",
                patch.id,
                patch.fields().collect::<Vec<_>>()
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Invariant helpers
// ---------------------------------------------------------------------------

/// Every field a patch writes must differ from the record's current value:
/// canonical fields are never rewritten.
pub fn assert_minimal(record: &Record, patch: &Patch) {
    for (field, value) in &patch.changes {
        let after = value.resolve(super::FROZEN_AT);
        assert_ne!(
            record.fields.get(field),
            Some(&after),
            "patch for {:?} rewrites {:?} with the value it already holds",
            record.id,
            field
        );
    }
}

/// Every field the patch does not name keeps its value after applying it.
pub fn assert_non_destructive(before: &Record, after: &Record, patch: &Patch) {
    for (field, value) in &before.fields {
        if !patch.touches(field) {
            pretty_assertions::assert_eq!(
                after.fields.get(field),
                Some(value),
                "field {:?} of {:?} changed without being patched",
                field,
                before.id
            );
        }
    }
}
