use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::DashboardError;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Optional override of the OpenWeather API root.
    pub base_url: Option<String>,

    /// Optional override of the directory holding search history.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding persisted dashboard state.
    pub fn history_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn set_api_key(&mut self, api_key: &str) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Effective API key: the environment wins over the file.
    ///
    /// Missing, blank, or placeholder keys are rejected up front so no doomed
    /// request is ever sent.
    pub fn api_key(&self) -> Result<String, DashboardError> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(from_env.as_deref(), self.api_key.as_deref())
    }

    /// Check a key typed by the user, ignoring the environment override.
    pub fn validate_api_key(api_key: &str) -> Result<String, DashboardError> {
        resolve_api_key(None, Some(api_key))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

fn resolve_api_key(
    from_env: Option<&str>,
    from_file: Option<&str>,
) -> Result<String, DashboardError> {
    [from_env, from_file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
        .map(str::to_string)
        .ok_or(DashboardError::ConfigurationMissing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_configuration_error() {
        let err = resolve_api_key(None, None).unwrap_err();
        assert_eq!(err, DashboardError::ConfigurationMissing);
    }

    #[test]
    fn placeholder_and_blank_keys_are_rejected() {
        assert!(resolve_api_key(None, Some("YOUR_API_KEY_HERE")).is_err());
        assert!(resolve_api_key(Some("   "), None).is_err());
    }

    #[test]
    fn environment_key_takes_precedence() {
        let key = resolve_api_key(Some("ENV_KEY"), Some("FILE_KEY")).unwrap();
        assert_eq!(key, "ENV_KEY");
    }

    #[test]
    fn blank_environment_key_falls_back_to_file() {
        let key = resolve_api_key(Some(""), Some(" FILE_KEY ")).unwrap();
        assert_eq!(key, "FILE_KEY");
    }

    #[test]
    fn entered_key_is_checked_on_its_own() {
        assert_eq!(Config::validate_api_key(" KEY ").unwrap(), "KEY");
        assert_eq!(Config::validate_api_key(""), Err(DashboardError::ConfigurationMissing));
        assert_eq!(
            Config::validate_api_key("YOUR_API_KEY_HERE"),
            Err(DashboardError::ConfigurationMissing)
        );
    }

    #[test]
    fn set_api_key_trims_input() {
        let mut cfg = Config::default();
        cfg.set_api_key("  KEY\n");
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn base_url_defaults_to_openweather() {
        let mut cfg = Config::default();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);

        cfg.base_url = Some("http://localhost:1234".into());
        assert_eq!(cfg.base_url(), "http://localhost:1234");
    }

    #[test]
    fn explicit_data_dir_is_used_for_history() {
        let cfg = Config { data_dir: Some(PathBuf::from("/tmp/wd")), ..Config::default() };
        assert_eq!(cfg.history_dir().unwrap(), PathBuf::from("/tmp/wd"));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY");
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, cfg);
    }
}
