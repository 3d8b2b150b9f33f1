//! Configuration management.

use crate::services::DEFAULT_ROW_LIMIT;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration for chainatlas.
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    /// Path to the SQLite graph database.
    pub store_path: PathBuf,
    /// Maximum node rows fetched per export.
    pub row_limit: usize,
    /// Summarization provider configuration.
    pub summarizer: SummarizerConfig,
}

/// Summarization provider configuration.
#[derive(Debug, Clone, Default)]
pub struct SummarizerConfig {
    /// Whether summarization enrichment is enabled.
    pub enabled: bool,
    /// Model name (provider default when absent).
    pub model: Option<String>,
    /// API key; falls back to the `DASHSCOPE_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Base URL for the provider (for self-hosted or proxy endpoints).
    pub base_url: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Graph database path.
    pub store_path: Option<String>,
    /// Export row limit.
    pub row_limit: Option<usize>,
    /// Summarizer section.
    pub summarizer: Option<ConfigFileSummarizer>,
}

/// Summarizer section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSummarizer {
    /// Enabled flag.
    pub enabled: Option<bool>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            row_limit: DEFAULT_ROW_LIMIT,
            summarizer: SummarizerConfig::default(),
        }
    }
}

/// Platform data dir (`~/.local/share/chainatlas/` on Linux), falling back
/// to the working directory.
fn default_store_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("chainatlas.db"),
        |dirs| dirs.data_dir().join("chainatlas").join("graph.db"),
    )
}

impl AtlasConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/chainatlas/` on macOS)
    /// 2. XDG config dir (`~/.config/chainatlas/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found. The
    /// `CHAINATLAS_STORE` environment variable overrides the store path
    /// wherever the rest of the configuration came from.
    #[must_use]
    pub fn load_default() -> Self {
        let mut config = Self::load_default_file();
        if let Ok(path) = std::env::var("CHAINATLAS_STORE") {
            if !path.is_empty() {
                config.store_path = PathBuf::from(path);
            }
        }
        config
    }

    fn load_default_file() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("chainatlas").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("chainatlas")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `AtlasConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(store_path) = file.store_path {
            config.store_path = PathBuf::from(store_path);
        }
        if let Some(row_limit) = file.row_limit {
            config.row_limit = row_limit;
        }
        if let Some(summarizer) = file.summarizer {
            if let Some(enabled) = summarizer.enabled {
                config.summarizer.enabled = enabled;
            }
            config.summarizer.model = summarizer.model;
            config.summarizer.api_key = summarizer.api_key;
            config.summarizer.base_url = summarizer.base_url;
        }

        config
    }

    /// Sets the store path.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Sets the export row limit.
    #[must_use]
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }
}
