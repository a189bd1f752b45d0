//! Driver — sequences fetch, plan and commit over every configured collection.
//!
//! Collections are scanned in configuration order, one at a time; a
//! sub-collection schema is scanned one parent record at a time. Every store
//! call is awaited before the next begins. The first store error stops the
//! run: nothing is checkpointed, and because planning is idempotent a re-run
//! simply starts over.

use crate::applier::BatchApplier;
use anyhow::Context;
use docfix_core::audit::{self, IntegrityIssue};
use docfix_core::config::Config;
use docfix_core::{CollectionSchema, Normalizer, PlanContext, Record, SnippetCatalog};
use docfix_store::{CollectionPath, DocumentStore};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Outcome of one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    /// Collection path, e.g. `lessons` or `quizzes/quiz_1/questions`.
    pub path: String,
    pub inspected: usize,
    /// Ids of records that needed a patch, in scan order.
    pub patched: Vec<String>,
    /// Patches actually committed (zero on a dry run).
    pub committed: usize,
}

/// Outcome of a full repair run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub scans: Vec<ScanReport>,
}

impl RunSummary {
    pub fn inspected(&self) -> usize {
        self.scans.iter().map(|s| s.inspected).sum()
    }

    pub fn patched(&self) -> usize {
        self.scans.iter().map(|s| s.patched.len()).sum()
    }

    pub fn committed(&self) -> usize {
        self.scans.iter().map(|s| s.committed).sum()
    }

    /// The report for a collection path, if it was scanned.
    pub fn scan(&self, path: &str) -> Option<&ScanReport> {
        self.scans.iter().find(|s| s.path == path)
    }
}

// ---------------------------------------------------------------------------
// Repair
// ---------------------------------------------------------------------------

/// A configured repair run against one store.
pub struct Repair<'a, S> {
    store: &'a S,
    config: &'a Config,
    snippets: Option<&'a SnippetCatalog>,
    only: Vec<String>,
}

impl<'a, S: DocumentStore> Repair<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self {
            store,
            config,
            snippets: None,
            only: Vec::new(),
        }
    }

    pub fn with_snippets(mut self, snippets: &'a SnippetCatalog) -> Self {
        self.snippets = Some(snippets);
        self
    }

    /// Restrict the run to schemas whose name (or parent name) is listed.
    pub fn only(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.only = names.into_iter().collect();
        self
    }

    /// Scan every selected collection, committing as it goes.
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let applier = BatchApplier::new(self.store, &self.config.run);
        let mut summary = RunSummary::default();

        for schema in selected(&self.config.collections, &self.only) {
            tracing::info!(collection = %schema.label(), "scanning");
            match &schema.parent {
                None => {
                    let path = CollectionPath::root(&schema.name);
                    let records = fetch(self.store, &path).await?;
                    let ctx = self.context();
                    summary
                        .scans
                        .push(self.scan(&applier, schema, &path, &records, ctx).await?);
                }
                Some(parent) => {
                    let parent_path = CollectionPath::root(parent);
                    let parents = fetch(self.store, &parent_path).await?;
                    for owner in &parents {
                        let path = parent_path.child(&owner.id, &schema.name);
                        let records = fetch(self.store, &path).await?;
                        let ctx = self.context().with_parent(owner);
                        summary
                            .scans
                            .push(self.scan(&applier, schema, &path, &records, ctx).await?);
                    }
                }
            }
        }

        tracing::info!(
            inspected = summary.inspected(),
            patched = summary.patched(),
            committed = summary.committed(),
            dry_run = applier.is_dry_run(),
            "repair finished"
        );
        Ok(summary)
    }

    fn context(&self) -> PlanContext<'a> {
        let ctx = PlanContext::default();
        match self.snippets {
            Some(catalog) => ctx.with_snippets(catalog),
            None => ctx,
        }
    }

    async fn scan(
        &self,
        applier: &BatchApplier<'_, S>,
        schema: &CollectionSchema,
        path: &CollectionPath,
        records: &[Record],
        ctx: PlanContext<'_>,
    ) -> anyhow::Result<ScanReport> {
        let patches = Normalizer::new(schema).plan(records, ctx);
        for patch in &patches {
            tracing::info!(
                %path,
                id = %patch.id,
                fields = ?patch.fields().collect::<Vec<_>>(),
                "patch planned"
            );
        }

        let committed = applier
            .apply(path, &patches)
            .await
            .with_context(|| format!("committing {} patches to {path}", patches.len()))?;

        tracing::info!(
            %path,
            inspected = records.len(),
            patched = patches.len(),
            committed,
            "scan done"
        );
        Ok(ScanReport {
            path: path.to_string(),
            inspected: records.len(),
            patched: patches.into_iter().map(|p| p.id).collect(),
            committed,
        })
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Run the integrity audit over every configured collection. Read-only.
pub async fn audit<S: DocumentStore>(store: &S, config: &Config) -> anyhow::Result<Vec<IntegrityIssue>> {
    let mut issues = Vec::new();

    for schema in &config.collections {
        if schema.required.is_empty() && schema.required_sequences.is_empty() {
            continue;
        }
        match &schema.parent {
            None => {
                let records = fetch(store, &CollectionPath::root(&schema.name)).await?;
                issues.extend(audit::audit(schema, &records));
            }
            Some(parent) => {
                let parent_path = CollectionPath::root(parent);
                for owner in fetch(store, &parent_path).await? {
                    let path = parent_path.child(&owner.id, &schema.name);
                    issues.extend(audit::audit(schema, &fetch(store, &path).await?));
                }
            }
        }
    }

    for issue in &issues {
        tracing::warn!("{issue}");
    }
    tracing::info!(issues = issues.len(), "audit finished");
    Ok(issues)
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// Parse a `{ id: { field: value } }` JSON object into records.
pub fn records_from_json(text: &str) -> anyhow::Result<Vec<Record>> {
    let bodies: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(text).context("seed input must be a JSON object keyed by record id")?;
    bodies
        .into_iter()
        .map(|(id, body)| {
            anyhow::ensure!(body.is_object(), "record {id:?} body is not a JSON object");
            Ok(Record::from_body(id, body))
        })
        .collect()
}

/// Set the full body of every record in the collection at `path`.
pub async fn seed<S: DocumentStore>(
    store: &S,
    path: &CollectionPath,
    records: Vec<Record>,
) -> anyhow::Result<usize> {
    let mut written = 0;
    for record in records {
        let id = record.id.clone();
        store
            .set(path, record)
            .await
            .with_context(|| format!("setting {path}/{id}"))?;
        tracing::info!(%path, %id, "record set");
        written += 1;
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn selected<'c>(
    collections: &'c [CollectionSchema],
    only: &'c [String],
) -> impl Iterator<Item = &'c CollectionSchema> {
    collections.iter().filter(move |schema| {
        only.is_empty()
            || only
                .iter()
                .any(|name| *name == schema.name || schema.parent.as_deref() == Some(name.as_str()))
    })
}

async fn fetch<S: DocumentStore>(store: &S, path: &CollectionPath) -> anyhow::Result<Vec<Record>> {
    store
        .list(path)
        .await
        .with_context(|| format!("listing {path}"))
}
