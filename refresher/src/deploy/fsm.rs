//! Finite State Machine for a single stack refresh

use serde::{Deserialize, Serialize};

/// Refresh state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
    /// Not started
    Pending,

    /// Resolving the stack definition
    Fetching,

    /// Deriving the update request
    Building,

    /// Waiting for the redeploy to be accepted
    Submitting,

    /// Outcome recorded
    Recorded,
}

impl std::fmt::Display for RefreshState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RefreshState::Pending => "pending",
            RefreshState::Fetching => "fetching",
            RefreshState::Building => "building",
            RefreshState::Submitting => "submitting",
            RefreshState::Recorded => "recorded",
        };
        f.write_str(name)
    }
}

/// Refresh event
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// Start fetching the definition
    Fetch,

    /// Definition resolved
    Fetched,

    /// Update request built
    Built,

    /// Update accepted by the managing API
    Accepted,

    /// Fetch or submit failed
    Failed(String),
}

/// Per-stack refresh FSM
///
/// `Building` has no failure edge: building the request is total.
#[derive(Debug, Clone)]
pub struct RefreshFsm {
    state: RefreshState,
    error: Option<String>,
    succeeded: bool,
}

impl RefreshFsm {
    /// Create a new FSM in pending state
    pub fn new() -> Self {
        Self {
            state: RefreshState::Pending,
            error: None,
            succeeded: false,
        }
    }

    /// Get current state
    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the refresh was recorded as a success
    pub fn succeeded(&self) -> bool {
        self.state == RefreshState::Recorded && self.succeeded
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: RefreshEvent) -> Result<RefreshState, String> {
        let new_state = match (&self.state, &event) {
            (RefreshState::Pending, RefreshEvent::Fetch) => RefreshState::Fetching,

            (RefreshState::Fetching, RefreshEvent::Fetched) => RefreshState::Building,
            (RefreshState::Fetching, RefreshEvent::Failed(err)) => {
                self.error = Some(err.clone());
                RefreshState::Recorded
            }

            (RefreshState::Building, RefreshEvent::Built) => RefreshState::Submitting,

            (RefreshState::Submitting, RefreshEvent::Accepted) => {
                self.succeeded = true;
                RefreshState::Recorded
            }
            (RefreshState::Submitting, RefreshEvent::Failed(err)) => {
                self.error = Some(err.clone());
                RefreshState::Recorded
            }

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(new_state)
    }
}

impl Default for RefreshFsm {
    fn default() -> Self {
        Self::new()
    }
}
