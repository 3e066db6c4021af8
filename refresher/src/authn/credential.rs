//! Credential selection

use secrecy::{ExposeSecret, SecretString};

use crate::errors::RefreshError;

/// The single authorization input active for a run
#[derive(Debug)]
pub enum Credential {
    /// Exchanged once for a session token, then dropped
    Password {
        username: String,
        password: SecretString,
    },

    /// Pre-issued access token, sent verbatim on every request
    AccessToken(SecretString),
}

/// Raw credential inputs gathered by the front-end
#[derive(Debug, Default)]
pub struct CredentialInput {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub access_token: Option<SecretString>,
}

impl CredentialInput {
    /// Select exactly one credential form
    ///
    /// A non-empty access token wins over a username/password pair.
    pub fn resolve(self) -> Result<Credential, RefreshError> {
        if let Some(token) = self.access_token.filter(|t| !t.expose_secret().is_empty()) {
            if self.username.is_some() || self.password.is_some() {
                tracing::debug!("Access token supplied, ignoring username/password");
            }
            return Ok(Credential::AccessToken(token));
        }

        let username = self.username.filter(|u| !u.trim().is_empty());
        let password = self.password.filter(|p| !p.expose_secret().is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok(Credential::Password { username, password }),
            (Some(_), None) => Err(RefreshError::ConfigError(
                "password is required when authenticating with a username".to_string(),
            )),
            (None, Some(_)) => Err(RefreshError::ConfigError(
                "username is required when authenticating with a password".to_string(),
            )),
            (None, None) => Err(RefreshError::ConfigError(
                "no credentials supplied: set an access token or a username and password"
                    .to_string(),
            )),
        }
    }
}
