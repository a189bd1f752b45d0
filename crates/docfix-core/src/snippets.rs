//! Snippet catalog — code snippets to backfill into quiz questions.
//!
//! The catalog is a JSON document keyed by parent title, then by question
//! text:
//!
//! ```json
//! {
//!   "Python Variables & Data Types": {
//!     "What is the result of: 10 // 3": { "codeSnippet": "10 // 3", "correctAnswer": "3" },
//!     "What is the output?": [
//!       { "questionText": "x = [1, 2, 3]\ny = x", "codeSnippet": "...", "correctAnswer": "[1, 2, 3, 4]" }
//!     ]
//!   }
//! }
//! ```
//!
//! A list is used when several questions in one quiz share the same text; the
//! entry is then picked by [`SnippetCatalog::lookup`].

use serde::Deserialize;
use std::collections::BTreeMap;

/// Length of the `questionText` prefix matched against a record's text.
pub const DISAMBIGUATION_PREFIX: usize = 20;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetEntry {
    #[serde(default)]
    pub question_text: Option<String>,
    pub code_snippet: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CatalogSlot {
    One(SnippetEntry),
    Many(Vec<SnippetEntry>),
}

/// Snippets keyed by parent title, then question text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SnippetCatalog {
    parents: BTreeMap<String, BTreeMap<String, CatalogSlot>>,
}

impl SnippetCatalog {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether any entry is registered for `parent_title`.
    pub fn covers(&self, parent_title: &str) -> bool {
        self.parents.contains_key(parent_title)
    }

    /// The snippet for a question, if the catalog has one.
    ///
    /// A single entry matches on text alone. When the text maps to a list,
    /// the first entry wins whose `questionText` prefix appears in `text`, or
    /// whose `correctAnswer` equals `answer`. Empty snippets never match.
    pub fn lookup(&self, parent_title: &str, text: &str, answer: Option<&str>) -> Option<&str> {
        let entry = match self.parents.get(parent_title)?.get(text)? {
            CatalogSlot::One(entry) => Some(entry),
            CatalogSlot::Many(entries) => entries.iter().find(|entry| {
                let by_text = entry.question_text.as_deref().is_some_and(|qt| {
                    let prefix: String = qt.chars().take(DISAMBIGUATION_PREFIX).collect();
                    text.contains(&prefix)
                });
                let by_answer = answer.is_some() && entry.correct_answer.as_deref() == answer;
                by_text || by_answer
            }),
        }?;
        Some(entry.code_snippet.as_str()).filter(|s| !s.is_empty())
    }
}
