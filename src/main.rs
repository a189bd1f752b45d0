use anyhow::Context;
use clap::{Parser, Subcommand};
use docfix::driver::{self, Repair};
use docfix::store::{CollectionPath, SnapshotStore};
use docfix_core::config::Config;
use docfix_core::SnippetCatalog;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docfix", about = "docfix — repair and normalize document-store content")]
struct Cli {
    /// Config file layered over the built-in repair plan
    /// (default: ~/.config/docfix/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan and commit patches for every configured collection.
    Repair {
        /// Snapshot file to repair in place.
        #[arg(long)]
        store: PathBuf,
        /// Snippet catalog (JSON) for the code-snippet backfill.
        #[arg(long)]
        snippets: Option<PathBuf>,
        /// Report planned patches without committing them.
        #[arg(long)]
        dry_run: bool,
        /// Only scan these collections (repeatable).
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,
    },
    /// Report records with blank required fields. Read-only.
    Audit {
        #[arg(long)]
        store: PathBuf,
    },
    /// Set full record bodies from a `{ id: body }` JSON file.
    Seed {
        #[arg(long)]
        store: PathBuf,
        /// Target collection, e.g. `lessons` or `quizzes/quiz_1/questions`.
        #[arg(long)]
        collection: String,
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "info" })
            }),
        )
        .init();

    exit_code(run(cli).await)
}

/// Log a failed run once, through the subscriber, and map it to the exit code.
fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        Command::Repair {
            store,
            snippets,
            dry_run,
            only,
        } => {
            config.run.dry_run |= dry_run;
            let store = SnapshotStore::open(&store).await?;
            let catalog = match snippets {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    Some(SnippetCatalog::from_json(&text)
                        .with_context(|| format!("parsing {}", path.display()))?)
                }
                None => None,
            };

            let mut repair = Repair::new(&store, &config).only(only);
            if let Some(catalog) = &catalog {
                repair = repair.with_snippets(catalog);
            }
            let summary = repair.run().await?;

            for scan in &summary.scans {
                if !scan.patched.is_empty() {
                    println!("{}: {} of {} patched", scan.path, scan.patched.len(), scan.inspected);
                }
            }
            println!(
                "total: {} inspected, {} patched, {} committed",
                summary.inspected(),
                summary.patched(),
                summary.committed()
            );
        }
        Command::Audit { store } => {
            let store = SnapshotStore::open(&store).await?;
            let issues = driver::audit(&store, &config).await?;
            for issue in &issues {
                println!("{issue}");
            }
            println!("total: {} issues", issues.len());
        }
        Command::Seed {
            store,
            collection,
            input,
        } => {
            let store = SnapshotStore::open(&store).await?;
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let records = driver::records_from_json(&text)?;
            let path = parse_collection_path(&collection)?;
            let written = driver::seed(&store, &path, records).await?;
            println!("total: {written} records set in {path}");
        }
    }

    Ok(())
}

/// `a/b/c` → collection `a`, record `b`, sub-collection `c`.
fn parse_collection_path(text: &str) -> anyhow::Result<CollectionPath> {
    let segments: Vec<&str> = text.split('/').collect();
    anyhow::ensure!(
        segments.len() % 2 == 1 && segments.iter().all(|s| !s.is_empty()),
        "invalid collection path {text:?}"
    );
    let mut path = CollectionPath::root(segments[0]);
    for pair in segments[1..].chunks_exact(2) {
        path = path.child(pair[0], pair[1]);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths_alternate_names_and_ids() {
        assert_eq!(parse_collection_path("lessons").unwrap(), CollectionPath::root("lessons"));
        assert_eq!(
            parse_collection_path("quizzes/quiz_1/questions").unwrap(),
            CollectionPath::root("quizzes").child("quiz_1", "questions")
        );
    }

    #[test]
    fn malformed_collection_paths_are_rejected() {
        assert!(parse_collection_path("quizzes/quiz_1").is_err());
        assert!(parse_collection_path("quizzes//questions").is_err());
        assert!(parse_collection_path("").is_err());
    }

    #[test]
    fn failed_run_exits_non_zero() {
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
        assert_eq!(exit_code(Err(anyhow::anyhow!("listing lessons"))), ExitCode::FAILURE);
    }
}
