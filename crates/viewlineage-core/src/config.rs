//! Configuration schema (viewlineage.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a batch run reacts to a view whose definition fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Record the failure against the view and continue with the rest
    #[default]
    Lenient,

    /// Abort the whole batch on the first failure
    Strict,
}

/// Output format for lineage results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned console table
    #[default]
    Table,

    /// JSON report
    Json,

    /// Markdown report
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Catalog source configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a catalog snapshot export (JSON)
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

/// Lineage extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Failure handling for views that do not parse
    #[serde(default)]
    pub strictness: Strictness,

    /// Drop text nodes consisting only of whitespace
    #[serde(default = "default_true")]
    pub strip_whitespace_text: bool,

    /// Expand the view set by one dependency hop
    #[serde(default)]
    pub recursive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            strip_whitespace_text: true,
            recursive: false,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Snapshot path resolved against the project root
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.catalog.snapshot.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
