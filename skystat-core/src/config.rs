use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::{Result, WeatherError};

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Default path for the summary report when the caller passes no `--out`.
    pub default_output: Option<PathBuf>,
}

impl Config {
    /// Return the stored API key, or a configuration error with a hint.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            WeatherError::Configuration(
                "No API key configured.\n\
                 Hint: run `skystat configure` and enter your OpenWeatherMap API key."
                    .into(),
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            WeatherError::Configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let cfg: Config = toml::from_str(&contents).map_err(|e| {
            WeatherError::Configuration(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Configuration(format!(
                    "Failed to create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let toml = toml::to_string_pretty(self).map_err(|e| {
            WeatherError::Configuration(format!("Failed to serialize configuration to TOML: {e}"))
        })?;

        fs::write(&path, toml).map_err(|e| {
            WeatherError::Configuration(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skystat", "skystat").ok_or_else(|| {
            WeatherError::Configuration("Could not determine platform config directory".into())
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `skystat configure`"));
    }

    #[test]
    fn set_api_key_makes_config_usable() {
        let mut cfg = Config::default();
        assert!(!cfg.is_configured());

        cfg.set_api_key("OPEN_KEY".into());

        assert!(cfg.is_configured());
        assert_eq!(cfg.require_api_key().expect("key must exist"), "OPEN_KEY");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.default_output = Some(PathBuf::from("/tmp/summary.json"));

        let text = toml::to_string_pretty(&cfg).expect("serialize must succeed");
        let parsed: Config = toml::from_str(&text).expect("parse must succeed");

        assert_eq!(parsed.api_key.as_deref(), Some("OPEN_KEY"));
        assert_eq!(parsed.default_output, cfg.default_output);
    }
}
