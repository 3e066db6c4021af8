//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::RefreshError;
use crate::logs::LogLevel;

/// Refresher settings, read from an optional JSON file
///
/// Passwords and access tokens are never read from this file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Portainer URL
    #[serde(default)]
    pub url: Option<String>,

    /// Username for the login exchange
    #[serde(default)]
    pub username: Option<String>,

    /// Only refresh stacks owned by this endpoint
    #[serde(default)]
    pub endpoint_id: Option<i64>,

    /// Name or ID of a single stack to refresh
    #[serde(default)]
    pub stack: Option<String>,

    /// Skip stacks that are not running
    #[serde(default)]
    pub only_active: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Timeout for ordinary API calls, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for the redeploy call, in seconds
    #[serde(default = "default_update_timeout")]
    pub update_timeout_secs: u64,

    /// Pause between consecutive stacks, in milliseconds
    #[serde(default = "default_pacing")]
    pub pacing_millis: u64,
}

fn default_request_timeout() -> u64 {
    15
}

fn default_update_timeout() -> u64 {
    180
}

fn default_pacing() -> u64 {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            endpoint_id: None,
            stack: None,
            only_active: false,
            log_level: LogLevel::default(),
            request_timeout_secs: default_request_timeout(),
            update_timeout_secs: default_update_timeout(),
            pacing_millis: default_pacing(),
        }
    }
}

/// Load settings from a JSON file
pub async fn load_settings(path: &Path) -> Result<Settings, RefreshError> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        RefreshError::ConfigError(format!(
            "Unable to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        RefreshError::ConfigError(format!(
            "Invalid settings file {}: {}",
            path.display(),
            e
        ))
    })
}
