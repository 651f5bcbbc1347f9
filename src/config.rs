use crate::domain::Theme;
use crate::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const API_URL_ENV: &str = "PLANNER_API_URL";

const MIN_TIMER_POLL_MS: u64 = 100;
const MAX_TIMER_POLL_MS: u64 = 60_000;

/// User configuration stored in config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend, without a trailing slash
    pub api_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// How often a running timer recomputes its elapsed minutes
    pub timer_poll_ms: u64,
    pub theme: Theme,
    /// Where exports are saved; the user's download dir when unset
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            timer_poll_ms: 1000,
            theme: Theme::Dark,
            download_dir: None,
        }
    }
}

impl Config {
    /// Load config from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        match read_file(path)? {
            Some(content) => {
                debug!(path = %path.display(), "loading config");
                toml::from_str(&content)
                    .with_context(|| format!("Invalid config file: {}", path.display()))
            }
            None => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        atomic_write(path, content.as_bytes())?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Apply overrides in precedence order: CLI flag, then environment
    pub fn with_overrides(mut self, cli_api_url: Option<String>, env_api_url: Option<String>) -> Self {
        if let Some(url) = cli_api_url.or(env_api_url).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn timer_poll_interval(&self) -> Duration {
        Duration::milliseconds(self.timer_poll_ms.clamp(MIN_TIMER_POLL_MS, MAX_TIMER_POLL_MS) as i64)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Write a default config file, refusing to overwrite an existing one
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }
    Config::default().save(path)
}
