//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use marquee_api::omdb::poster::DEFAULT_PLACEHOLDER;
use serde::{Deserialize, Serialize};

/// Fallback OMDb API key used when none is configured.
pub const DEFAULT_API_KEY: &str = "f1def80d";

/// Default OMDb endpoint.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default debounce quiet period in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Default term for the `featured` listing.
const DEFAULT_FEATURED_TERM: &str = "marvel";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDb connection settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
    /// Search behaviour settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// OMDb connection configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OmdbConfig {
    /// API key. Falls back to `OMDB_API_KEY`, then [`DEFAULT_API_KEY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Search behaviour configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before a typed query is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Term used by the `featured` listing.
    #[serde(default = "default_featured_term")]
    pub featured_term: String,
    /// Image path shown instead of an `"N/A"` poster.
    #[serde(default = "default_placeholder_poster")]
    pub placeholder_poster: String,
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_featured_term() -> String {
    String::from(DEFAULT_FEATURED_TERM)
}

fn default_placeholder_poster() -> String {
    String::from(DEFAULT_PLACEHOLDER)
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            featured_term: default_featured_term(),
            placeholder_poster: default_placeholder_poster(),
        }
    }
}

impl OmdbConfig {
    /// Resolves the API key.
    ///
    /// Precedence: `cli` flag, `env` value, config file, [`DEFAULT_API_KEY`].
    /// Blank values are skipped.
    #[must_use]
    pub fn resolve_api_key(&self, cli: Option<&str>, env: Option<&str>) -> String {
        [cli, env, self.api_key.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map_or_else(|| String::from(DEFAULT_API_KEY), String::from)
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SearchConfig {
    /// Returns the debounce quiet period.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Serializes the config as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }
}
