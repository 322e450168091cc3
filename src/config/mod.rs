//! Configuration storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analytics::{Analytics, LogAnalytics, NoopAnalytics};
use crate::engine::SessionOptions;
use crate::models::Site;

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site used when `--site` is not given
    pub default_site: Site,
    /// Simulated typing delay before each assistant reply
    pub typing_delay_ms: u64,
    /// Emit analytics events to the log
    pub analytics: bool,
    /// Source id reported when the widget opens
    pub chat_source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_site: Site::default(),
            typing_delay_ms: 500,
            analytics: true,
            chat_source: "chat_widget".to_string(),
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "practice-concierge", "practice-concierge")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            typing_delay: self.typing_delay(),
            source: self.chat_source.clone(),
        }
    }

    pub fn analytics(&self) -> Arc<dyn Analytics> {
        if self.analytics {
            Arc::new(LogAnalytics)
        } else {
            Arc::new(NoopAnalytics)
        }
    }
}
