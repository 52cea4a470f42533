//! Client-side configuration.
//!
//! This covers the knobs that live on this machine, not on the vault server
//! (for those see `models::ServerConfig`): which server to talk to and where
//! the session record is kept.
//!
//! Configuration is stored at `~/.config/lockbox/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/state directory paths
const APP_NAME: &str = "lockbox";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the server address
const API_URL_ENV: &str = "LOCKBOX_API_URL";

/// Built-in default server address
pub const DEFAULT_API_URL: &str = "http://localhost:3200/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Effective server address: explicit config, then the `LOCKBOX_API_URL`
    /// environment variable, then the built-in default.
    pub fn api_base_url(&self) -> String {
        self.api_url
            .clone()
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session record.
    pub fn state_dir() -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_api_url_wins() {
        let config = Config {
            api_url: Some("https://vault.example.com/api".to_string()),
        };
        assert_eq!(config.api_base_url(), "https://vault.example.com/api");
    }
}
