//! Resolved run options

use std::time::Duration;

use url::Url;

use crate::authn::credential::CredentialInput;
use crate::errors::RefreshError;
use crate::stacks::catalog::StackFilter;

/// API root path appended to the base URL
pub const API_ROOT: &str = "/api";

/// Options for a single refresh run
#[derive(Debug)]
pub struct RefreshOptions {
    /// Normalized API base URL (ends with the API root)
    pub base_url: String,

    /// Credential inputs, resolved before any network call
    pub credentials: CredentialInput,

    /// Which stacks to refresh
    pub filter: StackFilter,

    /// HTTP client options
    pub http: HttpOptions,

    /// Batch execution options
    pub batch: BatchOptions,
}

/// HTTP client options
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Timeout for ordinary API calls
    pub request_timeout: Duration,

    /// Timeout for the redeploy-and-repull call
    pub update_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
            update_timeout: Duration::from_secs(180),
        }
    }
}

/// Batch execution options
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Pause between consecutive stacks
    pub pacing: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(100),
        }
    }
}

/// Validate a Portainer URL and turn it into the API base URL
pub fn normalize_base_url(raw: &str) -> Result<String, RefreshError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RefreshError::ConfigError(
            "Portainer URL is required".to_string(),
        ));
    }

    let parsed = Url::parse(trimmed).map_err(|e| {
        RefreshError::ConfigError(format!("Invalid Portainer URL '{}': {}", trimmed, e))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(RefreshError::ConfigError(format!(
            "Invalid Portainer URL '{}': must start with http:// or https://",
            trimmed
        )));
    }

    let base = trimmed.trim_end_matches('/');
    if base.ends_with(API_ROOT) {
        Ok(base.to_string())
    } else {
        Ok(format!("{}{}", base, API_ROOT))
    }
}
