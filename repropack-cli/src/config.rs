use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::types::Result;

/// Global configuration for the ReproPack CLI
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_server_url")]
    pub server_url: String,
}

impl Config {
    pub fn default_server_url() -> String {
        "http://localhost:8000".to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Self::default_server_url(),
        }
    }
}

impl Config {
    /// Load configuration from ~/.repropack/config.toml
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to ~/.repropack/config.toml
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::config_file()?, content)?;

        Ok(())
    }

    /// Server URL, with an explicit `--server` taking precedence
    pub fn resolve_server(server_override: Option<String>) -> Result<String> {
        let url = match server_override {
            Some(url) => url,
            None => Self::load()?.server_url,
        };
        Ok(url.trim_end_matches('/').to_string())
    }

    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or("Could not find home directory")?;
        Ok(home.join(".repropack"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
