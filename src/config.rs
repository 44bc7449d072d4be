//! Configuration for scentdex
//!
//! Loaded from a TOML file; every section is optional and falls back to its
//! default, so an empty file is a valid configuration. Heuristic constants of
//! the extraction pipeline (slice window, sentinel words, note-icon patterns)
//! are exposed here rather than hard-coded, since they encode tolerance for
//! an externally-controlled document format that can drift.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::matching::MatcherConfig;
use crate::scraping::{FieldsConfig, NotesConfig};

/// Default user agent for outbound page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog input
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Fuzzy matcher tuning
    #[serde(default)]
    pub matching: MatcherConfig,
    /// Fetching and extraction
    #[serde(default)]
    pub scraping: ScrapingConfig,
    /// Profile cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Optional LLM summary capability
    #[serde(default)]
    pub summary: SummaryConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Headerless CSV of `brand,name,url` rows
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fragrances.csv"),
        }
    }
}

/// Fetching and extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// User agent sent with every fetch
    pub user_agent: String,
    /// Request timeout in seconds (single attempt, no retry)
    pub request_timeout_secs: u64,
    /// Note pyramid extraction knobs
    pub notes: NotesConfig,
    /// Field extraction knobs
    pub fields: FieldsConfig,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            notes: NotesConfig::default(),
            fields: FieldsConfig::default(),
        }
    }
}

/// Profile cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the cache database
    pub data_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: directories::ProjectDirs::from("", "", "scentdex")
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".scentdex")),
        }
    }
}

/// Optional LLM summary configuration. The summarizer is constructed only
/// when `api_key` is present; it is passed into the command layer as an
/// explicit capability, never discovered from ambient process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// API key for the chat completion endpoint; absent disables summaries
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Completion token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Log severity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields, collecting every problem so the user can fix the
    /// file in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.scraping.request_timeout_secs == 0 {
            errors.push("scraping.request_timeout_secs must be positive".to_string());
        }
        if self.scraping.user_agent.trim().is_empty() {
            errors.push("scraping.user_agent must not be empty".to_string());
        }

        if self.scraping.notes.max_note_len == 0 {
            errors.push("scraping.notes.max_note_len must be positive".to_string());
        }
        if self.scraping.notes.base_slice_window == 0 {
            errors.push("scraping.notes.base_slice_window must be positive".to_string());
        }
        if self.scraping.notes.flat_cap == 0 {
            errors.push("scraping.notes.flat_cap must be positive".to_string());
        }

        if self.scraping.fields.description_cap == 0 {
            errors.push("scraping.fields.description_cap must be positive".to_string());
        }
        if self.scraping.fields.accord_cap == 0 {
            errors.push("scraping.fields.accord_cap must be positive".to_string());
        }

        if self.matching.score_cutoff > 100 {
            errors.push("matching.score_cutoff must be at most 100".to_string());
        }
        if self.matching.limit == 0 {
            errors.push("matching.limit must be positive".to_string());
        }

        if self.summary.max_tokens == 0 {
            errors.push("summary.max_tokens must be positive".to_string());
        }
        if !(0.0..=2.0).contains(&self.summary.temperature) {
            errors.push("summary.temperature must be between 0.0 and 2.0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "))
        }
    }
}
