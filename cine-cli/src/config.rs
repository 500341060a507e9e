//! CineGraph configuration loading from `cinegraph.toml`.
//!
//! Configuration is optional. Every value has a default, and command-line
//! flags (or their environment variables) override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! path = "./test_kuzudb"
//!
//! [data]
//! dir = "./data"
//!
//! [embeddings]
//! provider = "openai"
//! model = "text-embedding-3-small"
//! dimension = 1536
//! timeout_secs = 30
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use std::path::{Path, PathBuf};

use cine_core::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL};
use cine_embeddings::{EmbeddingConfig, Provider, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "cinegraph.toml";

/// Graph database location used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "./test_kuzudb";

/// CSV directory used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure loaded from `cinegraph.toml`.
///
/// All sections are optional and use defaults if not specified.
#[derive(Debug, Deserialize, Default)]
pub struct CineConfig {
    /// Where the graph database lives.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Where the CSV files are read from.
    #[serde(default)]
    pub data: DataSection,

    /// Embedding provider settings.
    #[serde(default)]
    pub embeddings: EmbeddingsSection,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct DatabaseSection {
    /// Database path. Wiped and recreated by `cinegraph run`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DataSection {
    /// Directory holding the eleven CSV files.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Embedding settings. Unset fields fall back to the OpenAI defaults.
#[derive(Debug, Deserialize, Default)]
pub struct EmbeddingsSection {
    /// `openai` or `hash`
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    /// API base URL, e.g. `https://api.openai.com/v1`
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub dimension: Option<usize>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Prefer `OPENAI_API_KEY` over storing the key here.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Output formatting preferences.
///
/// Command-line flags (e.g., `--format json`) override these settings.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table`, `json` or `csv`
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output.
    ///
    /// Defaults to auto-detection when unset.
    #[serde(default)]
    pub color: Option<bool>,
}

/// Embedding values coming from flags or environment variables.
///
/// Each `Some` wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub dimension: Option<usize>,
    pub api_key: Option<String>,
}

impl CineConfig {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Otherwise
    /// `cinegraph.toml` in the working directory is used if present, and a
    /// broken file only logs a warning before falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Ok(Self::load_from(Path::new("."))),
        }
    }

    /// Load `cinegraph.toml` from `root`, returning defaults on any problem.
    pub fn load_from(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Database path: flag, then config file, then [`DEFAULT_DB_PATH`].
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    /// Data directory: flag, then config file, then [`DEFAULT_DATA_DIR`].
    pub fn data_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.data.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured color preference, or `None` to auto-detect.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    /// Merge overrides, file values and defaults into an [`EmbeddingConfig`].
    pub fn embedding_config(
        &self,
        overrides: &EmbeddingOverrides,
    ) -> Result<EmbeddingConfig, ConfigError> {
        let section = &self.embeddings;

        let provider = match overrides.provider.as_ref().or(section.provider.as_ref()) {
            Some(name) => name
                .parse::<Provider>()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            None => Provider::default(),
        };

        let dimension = overrides
            .dimension
            .or(section.dimension)
            .unwrap_or(DEFAULT_EMBEDDING_DIM);
        if dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding dimension must be greater than zero".to_string(),
            ));
        }

        Ok(EmbeddingConfig {
            provider,
            api_key: overrides.api_key.clone().or_else(|| section.api_key.clone()),
            model: overrides
                .model
                .clone()
                .or_else(|| section.model.clone())
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            endpoint: overrides
                .endpoint
                .clone()
                .or_else(|| section.endpoint.clone()),
            dimension,
            timeout_secs: section.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}
