use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::graph::{GraphParams, RenderOptions};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MeaningGraphConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub default_owner: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderConfig {
    pub base_symbol_size: u32,
    pub fullscreen_symbol_size: u32,
    pub detailed_labels: bool,
}

/// Similarity weights and tier thresholds. Defaults are the constants in
/// [`crate::graph`].
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GraphConfig {
    pub window: usize,
    pub vector_weight: f64,
    pub keyword_bonus: f64,
    pub strong_threshold: f64,
    pub weak_threshold: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8700,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_data_dir()
            .join("nodes.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            default_owner: "default".into(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_symbol_size: 20,
            fullscreen_symbol_size: 35,
            detailed_labels: false,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        let params = GraphParams::default();
        Self {
            window: params.window,
            vector_weight: params.vector_weight,
            keyword_bonus: params.keyword_bonus,
            strong_threshold: params.strong_threshold,
            weak_threshold: params.weak_threshold,
        }
    }
}

impl GraphConfig {
    pub fn params(&self) -> GraphParams {
        GraphParams {
            window: self.window,
            vector_weight: self.vector_weight,
            keyword_bonus: self.keyword_bonus,
            strong_threshold: self.strong_threshold,
            weak_threshold: self.weak_threshold,
        }
    }
}

impl RenderConfig {
    /// Render options for the normal or fullscreen view. `detailed`, when
    /// given, overrides the configured label mode in either direction.
    pub fn options(&self, fullscreen: bool, detailed: Option<bool>) -> RenderOptions {
        RenderOptions {
            base_symbol_size: if fullscreen {
                self.fullscreen_symbol_size
            } else {
                self.base_symbol_size
            },
            detailed_labels: detailed.unwrap_or(self.detailed_labels),
        }
    }
}

/// Returns `~/.meaning-graph/`
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".meaning-graph")
}

/// Returns the default config file path: `~/.meaning-graph/config.toml`
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

impl MeaningGraphConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MeaningGraphConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (MEANING_GRAPH_DB, MEANING_GRAPH_OWNER, MEANING_GRAPH_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEANING_GRAPH_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MEANING_GRAPH_OWNER") {
            self.storage.default_owner = val;
        }
        if let Ok(val) = std::env::var("MEANING_GRAPH_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Owner to use when the caller did not name one.
    pub fn owner_or_default<'a>(&'a self, owner: Option<&'a str>) -> &'a str {
        owner.unwrap_or(self.storage.default_owner.as_str())
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
