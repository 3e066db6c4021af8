//! HTTP client implementation

use std::time::Duration;

use portainer_models::{AuthenticateRequest, AuthenticateResponse, ErrorResponse};
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::authn::credential::Credential;
use crate::authn::session::Session;
use crate::config::options::HttpOptions;
use crate::errors::RefreshError;
use crate::utils::truncate;

/// Longest raw body echoed back in an error message
const MAX_ERROR_BODY_CHARS: usize = 256;

/// HTTP client for the Portainer API
pub struct HttpClient {
    client: Client,
    base_url: String,
    options: HttpOptions,
    session: Option<Session>,
}

impl HttpClient {
    /// Create a new, unauthenticated HTTP client
    pub fn new(base_url: &str, options: &HttpOptions) -> Result<Self, RefreshError> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(concat!("portainer-refresher/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            options: options.clone(),
            session: None,
        })
    }

    /// Get the options
    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    /// Get the session, once authenticated
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// URL used before a session exists
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Establish the session for this run
    ///
    /// A password credential is exchanged for a session token and dropped;
    /// an access token is kept as-is without any network call.
    pub async fn authenticate(&mut self, credential: Credential) -> Result<&Session, RefreshError> {
        if self.session.is_some() {
            return Err(RefreshError::AuthError(
                "session already established".to_string(),
            ));
        }

        let session = match credential {
            Credential::AccessToken(token) => {
                debug!("Using access token authentication");
                Session::access_token(&self.base_url, token)
            }
            Credential::Password { username, password } => {
                let jwt = self.login(&username, password).await?;
                let session = Session::bearer(&self.base_url, jwt);
                let user = session.username().unwrap_or(&username);
                match session.expires_at() {
                    Some(expires_at) => {
                        info!("Authenticated as {}, session expires at {}", user, expires_at)
                    }
                    None => info!("Authenticated as {}", user),
                }
                session
            }
        };

        Ok(self.session.insert(session))
    }

    /// Exchange a username and password for a session token
    async fn login(&self, username: &str, password: SecretString) -> Result<String, RefreshError> {
        let url = self.url("/auth");
        debug!("POST {}", url);

        let body = AuthenticateRequest {
            username,
            password: password.expose_secret(),
        };
        let response = self.client.post(&url).json(&body).send().await?;
        drop(password);

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            error!("Authentication rejected: {} - {}", status, text);
            return Err(RefreshError::AuthError(format!(
                "{} ({}): check the username and password",
                error_message(&text),
                status.as_u16()
            )));
        }

        if !status.is_success() {
            error!("Authentication failed: {} - {}", status, text);
            return Err(RefreshError::ApiError {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let body: AuthenticateResponse = serde_json::from_str(&text).map_err(|e| {
            RefreshError::AuthError(format!("malformed authentication response: {}", e))
        })?;

        body.jwt.filter(|jwt| !jwt.is_empty()).ok_or_else(|| {
            RefreshError::AuthError("authentication response does not contain a token".to_string())
        })
    }

    /// Make an authenticated request and decode the JSON response
    ///
    /// A successful response without a body yields an empty JSON object.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<Value, RefreshError>
    where
        B: Serialize + ?Sized,
    {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| RefreshError::AuthError("not authenticated".to_string()))?;

        let url = session.url(path);
        debug!("{} {}", method, url);

        let mut request = session.apply(self.client.request(method.clone(), &url));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(
                "HTTP {} {} failed: {} - {}",
                method,
                path,
                status,
                truncate(&text, MAX_ERROR_BODY_CHARS)
            );
            return Err(RefreshError::ApiError {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RefreshError> {
        let value = self.request::<()>(Method::GET, path, query, None, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, RefreshError> {
        let value = self.request(Method::PUT, path, query, Some(body), timeout).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Extract a readable message from an error body
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        if let Some(message) = parsed.message.or(parsed.details).filter(|m| !m.is_empty()) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        truncate(trimmed, MAX_ERROR_BODY_CHARS)
    }
}
