use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_URL_ENV: &str = "TRIP_TUI_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    /// Base URL of the trip planner backend, e.g. "http://localhost:8000"
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where exported PDFs are written. Defaults to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            export_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl TripConfig {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("trip-tui"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("trip-tui.log"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Apply `TRIP_TUI_API_URL` on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }

    fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        self
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TripConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, TripConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "export_dir = \"/tmp/trips\"\n").unwrap();

        let config = TripConfig::load_from(&path).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/trips"));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = TripConfig {
            api_url: "https://trips.example.com".to_string(),
            export_dir: None,
            log_level: "debug".to_string(),
        };
        config.save_to(&path).unwrap();
        assert_eq!(TripConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn env_url_overrides_file() {
        let config = TripConfig::default()
            .with_api_url_override(Some("http://backend:9000".to_string()));
        assert_eq!(config.api_url, "http://backend:9000");

        let config = TripConfig::default().with_api_url_override(Some("  ".to_string()));
        assert_eq!(config.api_url, "http://localhost:8000");
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [").unwrap();
        let err = TripConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
