//! Per-stack outcomes and the run summary

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::errors::{ErrorKind, RefreshError};
use crate::models::stack::StackSummary;

/// Where the deployable content of an update came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Present on the detail response
    Inline,
    /// Retrieved from the dedicated file endpoint
    Fallback,
    /// Not resolved; the update was sent without content
    Missing,
}

/// Why a stack failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFailure {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl From<&RefreshError> for StackFailure {
    fn from(err: &RefreshError) -> Self {
        Self {
            kind: err.kind(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Result of refreshing a single stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub stack_id: i64,
    pub stack_name: String,
    pub endpoint_id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StackFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_source: Option<ContentSource>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl UpdateOutcome {
    pub fn succeeded(
        stack: &StackSummary,
        content_source: ContentSource,
        elapsed: Duration,
    ) -> Self {
        Self {
            stack_id: stack.id,
            stack_name: stack.name.clone(),
            endpoint_id: stack.endpoint_id,
            success: true,
            error: None,
            content_source: Some(content_source),
            elapsed,
        }
    }

    pub fn failed(
        stack: &StackSummary,
        error: &RefreshError,
        content_source: Option<ContentSource>,
        elapsed: Duration,
    ) -> Self {
        Self {
            stack_id: stack.id,
            stack_name: stack.name.clone(),
            endpoint_id: stack.endpoint_id,
            success: false,
            error: Some(StackFailure::from(error)),
            content_source,
            elapsed,
        }
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<UpdateOutcome>,
}

impl RunSummary {
    pub fn from_outcomes(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        outcomes: Vec<UpdateOutcome>,
    ) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> u8 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}
