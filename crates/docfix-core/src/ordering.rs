//! Ordering — deterministic sibling positions for records missing one.
//!
//! Siblings are sorted by identifier (byte-wise, ascending). A record whose
//! ordering field is absent or null is assigned its 0-based position in that
//! order; records that already carry a value keep it but still occupy their
//! slot. Identifiers never change, so repeated runs assign the same
//! positions.

use crate::types::Record;
use std::collections::BTreeMap;

/// Positions for every sibling missing `field`, keyed by record id.
pub fn assign_positions(siblings: &[Record], field: &str) -> BTreeMap<String, i64> {
    let mut sorted: Vec<&Record> = siblings.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    sorted
        .into_iter()
        .enumerate()
        .filter(|(_, record)| record.shape(field).is_missing())
        .map(|(position, record)| (record.id.clone(), position as i64))
        .collect()
}
