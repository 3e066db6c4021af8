//! Error types for the stack refresher

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the stack refresher
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Error category, recorded in outcomes instead of the error itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Auth,
    Transport,
    Api,
    Decode,
    Io,
}

impl RefreshError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RefreshError::ConfigError(_) => ErrorKind::Configuration,
            RefreshError::AuthError(_) => ErrorKind::Auth,
            RefreshError::TransportError(_) => ErrorKind::Transport,
            RefreshError::ApiError { .. } => ErrorKind::Api,
            RefreshError::DecodeError(_) => ErrorKind::Decode,
            RefreshError::IoError(_) => ErrorKind::Io,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            RefreshError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RefreshError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RefreshError::DecodeError(err.to_string())
        } else if err.is_timeout() {
            RefreshError::TransportError(format!("request timed out: {}", err))
        } else {
            RefreshError::TransportError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RefreshError {
    fn from(err: serde_json::Error) -> Self {
        RefreshError::DecodeError(err.to_string())
    }
}
