//! Configuration loading for edupanel.
//! Reads edupanel.toml from the current directory or the path in EDUPANEL_CONFIG,
//! then applies EDUPANEL_* environment overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_PATH_VAR: &str = "EDUPANEL_CONFIG";
pub const BIND_VAR: &str = "EDUPANEL_BIND";
pub const CHAT_URL_VAR: &str = "EDUPANEL_CHAT_URL";
pub const STAFF_URL_VAR: &str = "EDUPANEL_STAFF_URL";
pub const ANALYSIS_URL_VAR: &str = "EDUPANEL_ANALYSIS_URL";

const DEFAULT_CONFIG_PATH: &str = "edupanel.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Open views kept per page kind before the oldest is evicted.
    #[serde(default = "default_max_views")]
    pub max_views_per_page: usize,
}

fn default_bind()      -> String { "127.0.0.1:8080".to_string() }
fn default_max_views() -> usize  { 256 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), max_views_per_page: default_max_views() }
    }
}

/// Base URLs of the external services. Paths are fixed by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    #[serde(default = "default_chat_url")]
    pub chat_base_url: String,
    #[serde(default = "default_staff_url")]
    pub staff_base_url: String,
    #[serde(default = "default_analysis_url")]
    pub analysis_base_url: String,
}

fn default_chat_url()     -> String { "http://localhost:3001".to_string() }
fn default_staff_url()    -> String { "http://localhost:3000".to_string() }
fn default_analysis_url() -> String { "http://localhost:3001".to_string() }

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            chat_base_url: default_chat_url(),
            staff_base_url: default_staff_url(),
            analysis_base_url: default_analysis_url(),
        }
    }
}

/// What a page does with a submit while an earlier request is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Ignore the submit until the pending request settles.
    RejectWhilePending,
    /// Accept it; only the most recently issued request may settle into state.
    #[default]
    LatestWins,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_year")]
    pub default_year: i32,
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_year()     -> i32 { 2024 }
fn default_min_year() -> i32 { 2000 }
fn default_max_year() -> i32 { 2100 }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}


impl Config {
    /// Load configuration from edupanel.toml, falling back to defaults when the
    /// file does not exist, then apply environment overrides and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
            info!("Loaded configuration from {}", path);
            Self::from_toml_str(&content)?
        } else {
            debug!("{} not found, using defaults", path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply EDUPANEL_* overrides. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get(BIND_VAR) {
            self.server.bind = bind;
        }
        if let Some(url) = get(CHAT_URL_VAR) {
            self.backends.chat_base_url = url;
        }
        if let Some(url) = get(STAFF_URL_VAR) {
            self.backends.staff_base_url = url;
        }
        if let Some(url) = get(ANALYSIS_URL_VAR) {
            self.backends.analysis_base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("backends.chat_base_url", &self.backends.chat_base_url),
            ("backends.staff_base_url", &self.backends.staff_base_url),
            ("backends.analysis_base_url", &self.backends.analysis_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be an http(s) URL, got {url:?}"
                )));
            }
        }

        if self.server.max_views_per_page == 0 {
            return Err(ConfigError::Invalid(
                "server.max_views_per_page must be at least 1".to_string(),
            ));
        }

        let a = &self.analysis;
        if a.min_year > a.max_year {
            return Err(ConfigError::Invalid(format!(
                "analysis.min_year ({}) is after analysis.max_year ({})",
                a.min_year, a.max_year
            )));
        }
        if !(a.min_year..=a.max_year).contains(&a.default_year) {
            return Err(ConfigError::Invalid(format!(
                "analysis.default_year ({}) is outside {}..={}",
                a.default_year, a.min_year, a.max_year
            )));
        }
        Ok(())
    }
}
