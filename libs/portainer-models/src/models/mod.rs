//! API models

use serde::{Deserialize, Serialize};

/// Login request for `POST /auth`
///
/// Borrows the credentials so the password is never copied out of its
/// owning secret.
#[derive(Clone, Copy, Serialize)]
pub struct AuthenticateRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for AuthenticateRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(default)]
    pub jwt: Option<String>,
}

/// A single environment variable of a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Pair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Nested stack options, as returned by the detail endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOption {
    #[serde(default)]
    pub prune: Option<bool>,
}

/// Stack record returned by `GET /stacks` and `GET /stacks/{id}`
///
/// The listing only guarantees the summary fields; the deployable content
/// and environment are filled in by the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stack {
    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub endpoint_id: i64,

    /// 1: swarm, 2: compose, 3: kubernetes
    #[serde(default)]
    pub r#type: i64,

    /// 1: active, 2: inactive
    #[serde(default)]
    pub status: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_file_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<Pair>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune_services: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<StackOption>,
}

/// Response of `GET /stacks/{id}/file`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackFileResponse {
    #[serde(default)]
    pub stack_file_content: Option<String>,
}

/// Body of `PUT /stacks/{id}?endpointId={endpointId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackUpdateRequest {
    pub pull_image: bool,
    pub prune_services: bool,
    pub env: Vec<Pair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_file_content: Option<String>,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}
