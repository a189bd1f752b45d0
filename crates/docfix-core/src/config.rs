//! Configuration types for docfix.
//!
//! [`Config::load`] reads `~/.config/docfix/config.toml` (or an explicit
//! path), layered on top of the embedded repair plan, creating the default
//! file if it does not yet exist. [`Config::defaults`] returns the embedded
//! plan without touching the filesystem (useful in tests).

use crate::error::SchemaError;
use crate::schema::CollectionSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[run]
max_batch_writes = 500
dry_run          = false

[[collections]]
name     = "courses"
required = ["title", "description", "language", "difficulty", "moduleCount"]
defaults = [
  { kind = "literal", field = "thumbnailUrl", value = "" },
  { kind = "literal", field = "rating", value = 0.0 },
  { kind = "literal", field = "category", value = "Programming Languages" },
  { kind = "server_timestamp", field = "updatedAt" },
  { kind = "literal", field = "icon", value = "🐍" },
  { kind = "literal", field = "isFeatured", value = false },
  { kind = "scaled", field = "estimatedHours", from = "moduleCount", factor = 2 },
]

[[collections]]
name       = "achievements"
migrations = [{ field = "iconAsset", synonyms = ["icon"] }]

[[collections]]
name       = "user_stats"
migrations = [
  { field = "lessonsCompleted", synonyms = ["totalLessonsCompleted"] },
  { field = "quizzesCompleted", synonyms = ["totalQuizzesCompleted"] },
]
defaults = [
  { kind = "literal", field = "challengesCompleted", value = 0 },
  { kind = "literal", field = "coursesCompleted", value = 0 },
  { kind = "literal", field = "perfectQuizzes", value = 0 },
  { kind = "literal", field = "currentStreak", value = 0 },
  { kind = "literal", field = "longestStreak", value = 0 },
  { kind = "literal", field = "level", value = 1 },
  { kind = "literal", field = "xpHistory", value = {} },
  { kind = "literal", field = "dailyXP", value = {} },
]

[[collections]]
name     = "modules"
required = ["courseId"]
required_sequences = ["lessonIds"]

[[collections]]
name     = "lessons"
required = ["moduleId", "courseId"]
defaults = [
  { kind = "server_timestamp", field = "createdAt" },
  { kind = "server_timestamp", field = "updatedAt" },
  { kind = "literal", field = "xpReward", value = 10 },
  { kind = "literal", field = "videoUrl", value = "" },
  { kind = "literal", field = "keyPoints", value = [] },
  { kind = "literal", field = "codeExamples", value = [] },
]

[[collections]]
name     = "progress"
defaults = [
  { kind = "literal", field = "quizScores", value = {} },
  { kind = "literal", field = "currentModuleId", value = "" },
  { kind = "literal", field = "currentLessonId", value = "" },
  { kind = "literal", field = "lastAccessedLesson", value = "" },
  { kind = "server_timestamp", field = "lastAccessedAt" },
  { kind = "literal", field = "completionPercentage", value = 0 },
]

[[collections]]
name     = "questions"
parent   = "quizzes"
boolean  = { type_value = "boolean", keyword = "true or false" }
snippets = { field = "codeSnippet", parent_title_field = "title" }
ordering = { field = "orderIndex" }
defaults = [
  { kind = "literal", field = "points", value = 1 },
  { kind = "literal", field = "difficulty", value = "easy" },
]
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/docfix/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    /// Repair plan, scanned in order.
    #[serde(default)]
    pub collections: Vec<CollectionSchema>,
}

/// `[run]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Upper bound on writes per committed batch.
    #[serde(default = "default_max_batch_writes")]
    pub max_batch_writes: usize,
    /// Plan and report without committing.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_max_batch_writes() -> usize { 500 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_batch_writes: default_max_batch_writes(),
            dry_run: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `path`, or from `~/.config/docfix/config.toml` when `path`
    /// is `None`, layered on top of the built-in defaults. The default
    /// location is created with the defaults if it does not exist; an
    /// explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = config_path();
                if !path.exists() {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
                }
                path
            }
        };

        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(true))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Check every collection schema, and that the batch bound is usable.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.run.max_batch_writes == 0 {
            return Err(SchemaError::ZeroBatchSize);
        }
        self.collections.iter().try_for_each(CollectionSchema::validate)
    }

    /// The schema for a collection, by name.
    pub fn collection(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.iter().find(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("docfix")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
