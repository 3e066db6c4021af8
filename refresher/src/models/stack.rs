//! Stack models

use portainer_models::{Pair, Stack};
use serde::{Deserialize, Serialize};

/// Declared deployment type of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Swarm,
    Compose,
    Kubernetes,
    Other(i64),
}

impl From<i64> for StackKind {
    fn from(value: i64) -> Self {
        match value {
            1 => StackKind::Swarm,
            2 => StackKind::Compose,
            3 => StackKind::Kubernetes,
            other => StackKind::Other(other),
        }
    }
}

impl std::fmt::Display for StackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackKind::Swarm => write!(f, "swarm"),
            StackKind::Compose => write!(f, "compose"),
            StackKind::Kubernetes => write!(f, "kubernetes"),
            StackKind::Other(value) => write!(f, "type {}", value),
        }
    }
}

/// Runtime status of a stack
///
/// Only the numeric value matters: `1` is running, whatever it is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackStatus {
    Active,
    Inactive,
    Other(i64),
}

impl From<i64> for StackStatus {
    fn from(value: i64) -> Self {
        match value {
            1 => StackStatus::Active,
            2 => StackStatus::Inactive,
            other => StackStatus::Other(other),
        }
    }
}

/// A stack as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    pub id: i64,
    pub name: String,
    pub endpoint_id: i64,
    pub kind: StackKind,
    pub status: StackStatus,
}

impl StackSummary {
    pub fn is_active(&self) -> bool {
        self.status == StackStatus::Active
    }

    /// Fill fields the detail record left out from the listed record
    ///
    /// Endpoint identifiers start at 1, so 0 means the field was absent.
    pub fn fill_missing(&mut self, listed: &StackSummary) {
        if self.endpoint_id == 0 {
            self.endpoint_id = listed.endpoint_id;
        }
        if self.name.is_empty() {
            self.name = listed.name.clone();
        }
        if self.kind == StackKind::Other(0) {
            self.kind = listed.kind;
        }
    }
}

impl From<&Stack> for StackSummary {
    fn from(stack: &Stack) -> Self {
        Self {
            id: stack.id,
            name: stack.name.clone(),
            endpoint_id: stack.endpoint_id,
            kind: StackKind::from(stack.r#type),
            status: StackStatus::from(stack.status),
        }
    }
}

impl From<Stack> for StackSummary {
    fn from(stack: Stack) -> Self {
        StackSummary::from(&stack)
    }
}

impl std::fmt::Display for StackSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

/// Full deployable definition of one stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDefinition {
    pub summary: StackSummary,

    /// Deployable content; `None` when absent or empty
    pub content: Option<String>,

    /// Environment, in declared order
    pub env: Vec<Pair>,

    /// Prune services that are no longer declared
    pub prune: bool,
}

impl From<Stack> for StackDefinition {
    fn from(stack: Stack) -> Self {
        let summary = StackSummary::from(&stack);
        let prune = stack
            .prune_services
            .or_else(|| stack.option.as_ref().and_then(|o| o.prune))
            .unwrap_or(false);

        Self {
            summary,
            content: stack.stack_file_content.filter(|c| !c.is_empty()),
            env: stack.env.unwrap_or_default(),
            prune,
        }
    }
}
