//! Configuration file handling and polling budget

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Seconds between two status fetches; not configurable
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend endpoints
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Backend endpoint settings
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL of the API all requests are sent to
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the web app, used for the collection status link
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Timeout for a single HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            app_url: default_app_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://cj-backend.foreai.co".to_string()
}
fn default_app_url() -> String {
    "https://cj.foreai.co".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from an explicit path, or from the default config
    /// file location
    ///
    /// Returns default configuration if no file exists at the default location.
    /// An explicit path that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

/// Maximum wall-clock time to wait for a verdict, validated to `[30, 900]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout(u64);

impl WaitTimeout {
    pub const MIN_SECS: u64 = 30;
    pub const MAX_SECS: u64 = 900;
    pub const DEFAULT_SECS: u64 = 300;

    pub fn new(secs: u64) -> Result<Self> {
        if !(Self::MIN_SECS..=Self::MAX_SECS).contains(&secs) {
            return Err(Error::WaitTimeoutOutOfRange {
                value: secs,
                min: Self::MIN_SECS,
                max: Self::MAX_SECS,
            });
        }
        Ok(Self(secs))
    }

    pub fn secs(&self) -> u64 {
        self.0
    }
}

/// Attempt budget shared by both polling loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPlan {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPlan {
    /// `max_attempts = ceil(wait / interval)`
    pub fn new(wait: WaitTimeout, interval: Duration) -> Self {
        let interval_secs = interval.as_secs().max(1);
        let attempts = wait.secs().div_ceil(interval_secs);
        Self {
            max_attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
            interval,
        }
    }
}
