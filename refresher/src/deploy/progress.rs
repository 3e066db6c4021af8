//! Progress reporting hooks for a batch

use crate::deploy::fsm::RefreshState;
use crate::models::outcome::{RunSummary, UpdateOutcome};
use crate::models::stack::StackSummary;

/// Receives batch progress as it happens
///
/// All methods default to no-ops. Indexes are zero-based.
pub trait ProgressSink: Send + Sync {
    fn batch_started(&self, _total: usize) {}

    fn stack_started(&self, _index: usize, _total: usize, _stack: &StackSummary) {}

    fn stack_transition(&self, _stack: &StackSummary, _state: RefreshState) {}

    fn stack_warning(&self, _stack: &StackSummary, _message: &str) {}

    fn stack_finished(&self, _index: usize, _total: usize, _outcome: &UpdateOutcome) {}

    fn batch_finished(&self, _summary: &RunSummary) {}
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}
