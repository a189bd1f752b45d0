//! Audit — read-only integrity checks over a collection snapshot.
//!
//! The audit never proposes patches; it reports records whose required
//! fields are blank or whose sequence fields hold something else, so an
//! operator can fix the content upstream.

use crate::schema::CollectionSchema;
use crate::types::{FieldShape, Record};
use serde::Serialize;
use std::fmt;

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// Absent, null, or the empty string.
    Missing,
    /// Present but not a sequence.
    NotSequence,
}

/// One integrity issue found by [`audit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityIssue {
    pub collection: String,
    pub id: String,
    pub field: String,
    pub problem: Problem,
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            Problem::Missing => write!(f, "{} {} missing field: {}", self.collection, self.id, self.field),
            Problem::NotSequence => write!(
                f,
                "{} {} missing or invalid sequence: {}",
                self.collection, self.id, self.field
            ),
        }
    }
}

/// Issues for every record in `records`, in record then field order.
pub fn audit(schema: &CollectionSchema, records: &[Record]) -> Vec<IntegrityIssue> {
    let label = schema.label();
    let mut issues = Vec::new();

    for record in records {
        for field in &schema.required {
            if record.shape(field).is_blank() {
                issues.push(issue(&label, record, field, Problem::Missing));
            }
        }
        for field in &schema.required_sequences {
            if !matches!(record.shape(field), FieldShape::Sequence(_)) {
                issues.push(issue(&label, record, field, Problem::NotSequence));
            }
        }
    }

    issues
}

fn issue(collection: &str, record: &Record, field: &str, problem: Problem) -> IntegrityIssue {
    IntegrityIssue {
        collection: collection.to_string(),
        id: record.id.clone(),
        field: field.to_string(),
        problem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn blank_and_non_sequence_fields_are_reported() {
        let mut schema = CollectionSchema::named("modules");
        schema.required = vec!["courseId".into()];
        schema.required_sequences = vec!["lessonIds".into()];

        let records = vec![
            Record::from_body("m1", json!({ "courseId": "python", "lessonIds": [] })),
            Record::from_body("m2", json!({ "courseId": "", "lessonIds": "l1,l2" })),
        ];

        let issues = audit(&schema, &records);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].to_string(), "modules m2 missing field: courseId");
        assert_eq!(issues[1].problem, Problem::NotSequence);
    }
}
