//! Sync configuration shared by clients.
//!
//! Settings are read from a JSON file, then selectively overridden from the
//! environment. Every field has a default so an absent file is valid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Placeholder JSON feed used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Category given to remote records that do not carry one.
pub const DEFAULT_REMOTE_CATEGORY: &str = "Server";

const DEFAULT_FETCH_LIMIT: usize = 10;
const DEFAULT_INTERVAL_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_ENDPOINT: &str = "QUOTESYNC_ENDPOINT";
pub const ENV_INTERVAL_SECS: &str = "QUOTESYNC_INTERVAL_SECS";
pub const ENV_MANUAL_CONFLICTS: &str = "QUOTESYNC_MANUAL_CONFLICTS";

/// Remote sync settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SyncSettings {
    /// Collection endpoint used for both fetch and upload
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Category for remote records without one
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Maximum number of remote records taken per fetch
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    /// Seconds between periodic sync cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Defer dirty-local conflicts to manual review instead of letting remote win
    #[serde(default)]
    pub manual_conflict_mode: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_category: default_category(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            interval_secs: DEFAULT_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            manual_conflict_mode: false,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_category() -> String {
    DEFAULT_REMOTE_CATEGORY.to_string()
}

const fn default_fetch_limit() -> usize {
    DEFAULT_FETCH_LIMIT
}

const fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SyncSettings {
    /// Load settings from `path`; a missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut settings = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(endpoint) = normalize_text_option(lookup(ENV_ENDPOINT)) {
            self.endpoint = endpoint;
        }

        if let Some(raw) = normalize_text_option(lookup(ENV_INTERVAL_SECS)) {
            self.interval_secs = raw.parse().map_err(|_| {
                Error::Config(format!("{ENV_INTERVAL_SECS} must be a whole number of seconds"))
            })?;
        }

        if let Some(raw) = normalize_text_option(lookup(ENV_MANUAL_CONFLICTS)) {
            self.manual_conflict_mode = parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("{ENV_MANUAL_CONFLICTS} must be true or false"))
            })?;
        }

        self.validate()
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(self.endpoint.trim()) {
            return Err(Error::Config(
                "endpoint must include http:// or https://".to_string(),
            ));
        }
        if self.default_category.trim().is_empty() {
            return Err(Error::Config(
                "default_category must not be empty".to_string(),
            ));
        }
        if self.fetch_limit == 0 {
            return Err(Error::Config("fetch_limit must be at least 1".to_string()));
        }
        if self.interval_secs == 0 {
            return Err(Error::Config(
                "interval_secs must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Periodic sync interval.
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    fn normalize(&mut self) {
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        self.default_category = self.default_category.trim().to_string();
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
