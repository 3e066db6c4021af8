//! Shared test helpers

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use portainer_models::{Pair, Stack, StackFileResponse, StackUpdateRequest};
use portainer_refresher::deploy::fsm::RefreshState;
use portainer_refresher::deploy::progress::ProgressSink;
use portainer_refresher::errors::RefreshError;
use portainer_refresher::http::stacks::StackApi;
use portainer_refresher::models::outcome::{RunSummary, UpdateOutcome};
use portainer_refresher::models::stack::StackSummary;

/// A call made against the fake API
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Option<i64>),
    Get(i64),
    File(i64),
    Update {
        id: i64,
        endpoint_id: i64,
        request: StackUpdateRequest,
    },
}

/// In-memory stack API
#[derive(Default)]
pub struct FakeStackApi {
    pub stacks: Vec<Stack>,
    pub files: HashMap<i64, String>,
    pub unreachable_details: HashSet<i64>,
    pub unreachable_files: HashSet<i64>,
    pub rejected_updates: HashMap<i64, u16>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeStackApi {
    pub fn new(stacks: Vec<Stack>) -> Self {
        Self {
            stacks,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(i64, i64, StackUpdateRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update {
                    id,
                    endpoint_id,
                    request,
                } => Some((id, endpoint_id, request)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StackApi for FakeStackApi {
    async fn list_stacks(&self, endpoint_id: Option<i64>) -> Result<Vec<Stack>, RefreshError> {
        self.record(Call::List(endpoint_id));
        Ok(self
            .stacks
            .iter()
            .map(|s| Stack {
                stack_file_content: None,
                env: None,
                ..s.clone()
            })
            .collect())
    }

    async fn get_stack(&self, id: i64) -> Result<Stack, RefreshError> {
        self.record(Call::Get(id));
        if self.unreachable_details.contains(&id) {
            return Err(RefreshError::TransportError("connection refused".to_string()));
        }
        self.stacks
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| RefreshError::ApiError {
                status: 404,
                message: "Stack not found".to_string(),
            })
    }

    async fn get_stack_file(&self, id: i64) -> Result<StackFileResponse, RefreshError> {
        self.record(Call::File(id));
        if self.unreachable_files.contains(&id) {
            return Err(RefreshError::ApiError {
                status: 500,
                message: "Unable to read stack file".to_string(),
            });
        }
        Ok(StackFileResponse {
            stack_file_content: self.files.get(&id).cloned(),
        })
    }

    async fn update_stack(
        &self,
        id: i64,
        endpoint_id: i64,
        request: &StackUpdateRequest,
    ) -> Result<(), RefreshError> {
        self.record(Call::Update {
            id,
            endpoint_id,
            request: request.clone(),
        });
        match self.rejected_updates.get(&id) {
            Some(status) => Err(RefreshError::ApiError {
                status: *status,
                message: "Update rejected".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Stack record as the detail endpoint returns it
pub fn stack(id: i64, name: &str, endpoint_id: i64, status: i64) -> Stack {
    Stack {
        id,
        name: name.to_string(),
        endpoint_id,
        r#type: 2,
        status,
        stack_file_content: Some(format!("services:\n  {}:\n    image: {}:latest\n", name, name)),
        env: Some(vec![Pair::new("STACK", name)]),
        prune_services: Some(false),
        option: None,
    }
}

/// Summary of a stack record
pub fn summary(stack: &Stack) -> StackSummary {
    StackSummary::from(stack)
}

/// Records progress callbacks as strings
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressSink for RecordingProgress {
    fn batch_started(&self, total: usize) {
        self.push(format!("batch:{}", total));
    }

    fn stack_started(&self, index: usize, total: usize, stack: &StackSummary) {
        self.push(format!("start:{}/{}:{}", index + 1, total, stack.id));
    }

    fn stack_transition(&self, stack: &StackSummary, state: RefreshState) {
        self.push(format!("{}:{}", stack.id, state));
    }

    fn stack_warning(&self, stack: &StackSummary, _message: &str) {
        self.push(format!("{}:warning", stack.id));
    }

    fn stack_finished(&self, _index: usize, _total: usize, outcome: &UpdateOutcome) {
        self.push(format!("finish:{}:{}", outcome.stack_id, outcome.success));
    }

    fn batch_finished(&self, summary: &RunSummary) {
        self.push(format!("done:{}/{}", summary.succeeded, summary.total));
    }
}
