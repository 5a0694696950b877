//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::core::error::{AeroError, AeroResult};

pub const DEFAULT_LOGIN_DELAY_MS: u64 = 500;
pub const DEFAULT_REPORT_DELAY_MS: u64 = 3000;
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "/downloads";

/// AeroCode configuration with layered hierarchy
///
/// Unset keys fall back to the built-in defaults through the accessors.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Simulated latency of a login, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_delay_ms: Option<u64>,

    /// Time before a requested report is marked generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_delay_ms: Option<u64>,

    /// Prefix of generated report download links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_prefix: Option<String>,
}

/// Fully resolved values, as printed by `aerocode config show`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub default_format: String,
    pub login_delay_ms: u64,
    pub report_delay_ms: u64,
    pub download_prefix: String,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_with(Self::global_config_path(), |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit global path and environment
    pub fn load_with<F>(global_path: Option<PathBuf>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl + accessors)

        // 2. Global user config (~/.config/aerocode/config.yaml)
        if let Some(path) = global_path.filter(|p| p.exists()) {
            config.merge_file(&path);
        }

        // 3. Explicit config file
        if let Some(path) = env("AEROCODE_CONFIG").map(PathBuf::from) {
            config.merge_file(&path);
        }

        // 4. Environment variables
        if let Some(format) = env("AEROCODE_FORMAT") {
            config.default_format = Some(format);
        }
        if let Some(ms) = env_ms(&env, "AEROCODE_LOGIN_DELAY_MS") {
            config.login_delay_ms = Some(ms);
        }
        if let Some(ms) = env_ms(&env, "AEROCODE_REPORT_DELAY_MS") {
            config.report_delay_ms = Some(ms);
        }
        if let Some(prefix) = env("AEROCODE_DOWNLOAD_PREFIX") {
            config.download_prefix = Some(prefix);
        }

        config
    }

    /// Read one YAML layer
    pub fn from_path(path: &Path) -> AeroResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AeroError::Config(format!("{}: {}", path.display(), e)))?;
        serde_yml::from_str(&contents)
            .map_err(|e| AeroError::Config(format!("{}: {}", path.display(), e)))
    }

    fn merge_file(&mut self, path: &Path) {
        match Self::from_path(path) {
            Ok(layer) => self.merge(layer),
            Err(e) => warn!("ignoring config layer: {}", e),
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "aerocode")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.login_delay_ms.is_some() {
            self.login_delay_ms = other.login_delay_ms;
        }
        if other.report_delay_ms.is_some() {
            self.report_delay_ms = other.report_delay_ms;
        }
        if other.download_prefix.is_some() {
            self.download_prefix = other.download_prefix;
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms.unwrap_or(DEFAULT_LOGIN_DELAY_MS))
    }

    pub fn report_delay(&self) -> Duration {
        Duration::from_millis(self.report_delay_ms.unwrap_or(DEFAULT_REPORT_DELAY_MS))
    }

    pub fn download_prefix(&self) -> &str {
        self.download_prefix
            .as_deref()
            .unwrap_or(DEFAULT_DOWNLOAD_PREFIX)
    }

    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            default_format: self
                .default_format
                .clone()
                .unwrap_or_else(|| "auto".to_string()),
            login_delay_ms: self.login_delay_ms.unwrap_or(DEFAULT_LOGIN_DELAY_MS),
            report_delay_ms: self.report_delay_ms.unwrap_or(DEFAULT_REPORT_DELAY_MS),
            download_prefix: self.download_prefix().to_string(),
        }
    }
}

fn env_ms<F>(env: &F, var: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = env(var)?;
    match value.trim().parse() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!("ignoring {}={:?}: not a number of milliseconds", var, value);
            None
        }
    }
}
