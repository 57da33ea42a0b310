use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

pub mod user;

pub use user::{MpdSettings, RadioStation, UserConfig};

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let xdg_dir = home.join(".config").join("jukebox");

        // Ensure it exists
        if !xdg_dir.exists() {
            let _ = std::fs::create_dir_all(&xdg_dir);
        }

        xdg_dir
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    /// Loads `path`, writing a default file if it is missing.
    /// An unreadable or malformed file falls back to defaults.
    pub fn load_from(path: &Path) -> UserConfig {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                    warn!(path = %path.display(), "Invalid config, using defaults: {}", e);
                    UserConfig::default()
                }),
                Err(e) => {
                    warn!(path = %path.display(), "Cannot read config, using defaults: {}", e);
                    UserConfig::default()
                }
            }
        } else {
            // Create default config.toml if missing
            let config = UserConfig::default();
            if let Err(e) = Self::save_to(&config, path) {
                warn!("Could not write default config: {:#}", e);
            }
            config
        }
    }

    pub fn save_to(config: &UserConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&UserConfig::default()).context("Failed to serialize config")
    }
}

impl MpdSettings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}
