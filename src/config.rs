//! Configuration management for avid-sample.
//!
//! Settings are resolved in increasing priority: built-in defaults, a config
//! file, environment variables, then command-line flags (applied by the CLI).

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of examples copied per extension.
pub const DEFAULT_MAX_EXAMPLES: usize = 3;

/// Config file basenames searched in the working directory.
const CONFIG_FILES: &[&str] = &["avid-sample.toml", "avid-sample.json"];

/// Environment variable overriding `max_examples`.
pub const MAX_EXAMPLES_ENV: &str = "AVID_SAMPLE_MAX_EXAMPLES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("AVID_SAMPLE_MAX_EXAMPLES must be a positive integer, got '{0}'")]
    InvalidEnv(String),
}

/// Names of the fixed folders and files inside an AVID package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub documents_dir: String,
    pub indices_dir: String,
    pub document_index: String,
    pub file_index: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            documents_dir: "Documents".to_string(),
            indices_dir: "Indices".to_string(),
            document_index: "docIndex.xml".to_string(),
            file_index: "fileIndex.xml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum examples per extension.
    pub max_examples: NonZeroUsize,
    pub package: PackageConfig,
    /// File this config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_examples: NonZeroUsize::new(DEFAULT_MAX_EXAMPLES)
                .unwrap_or(NonZeroUsize::MIN),
            package: PackageConfig::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or discover one in the
    /// working directory, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => match Self::discover(Path::new(".")) {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    Self::load_from_path(&path)?
                }
                None => Self::default(),
            },
        };
        config.with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// TOML for `.toml` files, JSON otherwise.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Apply `AVID_SAMPLE_MAX_EXAMPLES` if set and non-empty.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let value = std::env::var(MAX_EXAMPLES_ENV).ok();
        self.with_max_examples_override(value.as_deref())
    }

    fn with_max_examples_override(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.max_examples = raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnv(raw.to_string()))?;
        }
        Ok(self)
    }
}
