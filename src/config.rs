//! Runtime configuration.
//!
//! Loaded from `<config dir>/rabbit-hole/config.json` when present, then
//! overridden by environment variables:
//! - `RABBIT_HOLE_LANG` - Wikipedia language edition (default: `en`)
//! - `RABBIT_HOLE_WIKI_URL` - Base URL replacing `https://{lang}.wikipedia.org`
//! - `RABBIT_HOLE_PORT` - HTTP port for `rh serve` (default: `3000`)
//! - `RABBIT_HOLE_DEBOUNCE_MS` - Search debounce delay (default: `300`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "rabbit-hole";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wikipedia language code, e.g. `en` or `de`.
    pub language: String,
    /// Explicit API base URL. Mostly useful for pointing at a mirror or a test server.
    pub base_url: Option<String>,
    pub debounce_ms: u64,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            base_url: None,
            debounce_ms: 300,
            port: 3000,
        }
    }
}

impl Config {
    /// Load from the user's config directory and the environment.
    /// Falls back to defaults if the file is missing or unreadable.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load from an explicit file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply `RABBIT_HOLE_*` overrides looked up through `var`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(language) = var("RABBIT_HOLE_LANG") {
            self.language = language;
        }
        if let Some(url) = var("RABBIT_HOLE_WIKI_URL") {
            self.base_url = Some(url);
        }
        if let Some(port) = var("RABBIT_HOLE_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(ms) = var("RABBIT_HOLE_DEBOUNCE_MS").and_then(|ms| ms.parse().ok()) {
            self.debounce_ms = ms;
        }
        self
    }

    pub fn wiki_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}.wikipedia.org", self.language),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
