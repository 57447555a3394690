//! Node configuration (§6). Layered the way the teacher's config does it:
//! defaults, then `config.toml`, then `config.local.toml`, then
//! `FLUENT_`-prefixed environment variables, each layer overriding the one
//! before it.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

fn default_node_name() -> String {
    "node".to_string()
}

fn default_address() -> String {
    "127.0.0.1:9000".to_string()
}

fn default_lineage_batch_size() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Connection parameters for the lineage store; the store itself is
/// reached only through a [`crate::lineage::LineageSink`] the caller
/// supplies, so this crate never validates or opens the connection string
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageConfig {
    pub connection_string: Option<String>,
    #[serde(default = "default_lineage_batch_size")]
    pub batch_size: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        LineageConfig {
            connection_string: None,
            batch_size: default_lineage_batch_size(),
        }
    }
}

/// A single periodic timer declared in configuration, by name and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicConfig {
    pub name: String,
    pub period_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_node_name")]
    pub node_name: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub lineage: LineageConfig,
    #[serde(default)]
    pub periodics: Vec<PeriodicConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_name: default_node_name(),
            address: default_address(),
            lineage: LineageConfig::default(),
            periodics: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration by layering `config.toml`, `config.local.toml`,
    /// and `FLUENT_`-prefixed environment variables (double underscore as
    /// the nesting separator, e.g. `FLUENT_LINEAGE__BATCH_SIZE`) on top of
    /// the built-in defaults.
    pub fn load() -> Result<Config, ConfigError> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("FLUENT_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_node_address() {
        let config = Config::default();
        assert_eq!(config.node_name, "node");
        assert_eq!(config.address, "127.0.0.1:9000");
        assert!(config.periodics.is_empty());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).expect("config must serialize");
        assert!(serialized.contains("node_name"));
    }
}
