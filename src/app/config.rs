use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://admin-backend-vj3t6ewmoa-uc.a.run.app";
pub const DEFAULT_ENTITY_API_URL: &str = "https://admin-backend-85801868683.us-central1.run.app";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive for this crate's tracing output.
    pub fn directive(&self) -> String {
        let level = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        format!("checkwright={}", level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    #[serde(default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host serving `/Actors` and `/Workflows/{id}`.
    #[serde(default = "default_api_url")]
    pub base_url: String,
    /// Host serving entity lookups and workflow updates.
    #[serde(default = "default_entity_api_url")]
    pub entity_base_url: String,
    /// Publish through `update_old` instead of `update`.
    #[serde(default)]
    pub legacy_update: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_entity_api_url() -> String {
    DEFAULT_ENTITY_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            entity_base_url: default_entity_api_url(),
            legacy_update: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub show_logs: bool,
    #[serde(default = "default_true")]
    pub show_banner: bool,
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_logs: false,
            show_banner: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .context("Could not find home directory")?
            .join(".checkwright");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Command-line or environment values win over the file.
    pub fn with_overrides(mut self, api_url: Option<String>, entity_api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(url) = entity_api_url.filter(|u| !u.trim().is_empty()) {
            self.api.entity_base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.entity_base_url, DEFAULT_ENTITY_API_URL);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert!(!config.api.legacy_update);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nlegacy_update = true\n\n[global]\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.api.legacy_update);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.global.log_level, LogLevel::Debug);
        assert_eq!(config.proxy.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[proxy]\nbind = \"0.0.0.0:8080\"\n\n[ui]\nshow_logs = true\nshow_banner = false\ntick_rate_ms = 100\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.proxy.bind, "0.0.0.0:8080");
        assert!(loaded.ui.show_logs);
        assert!(!loaded.ui.show_banner);
        assert_eq!(loaded.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some("http://localhost:9000".into()), Some(" ".into()));
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.entity_base_url, DEFAULT_ENTITY_API_URL);
        assert_eq!(LogLevel::Warn.directive(), "checkwright=warn");
    }
}
