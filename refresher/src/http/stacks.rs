//! Stack API client

use async_trait::async_trait;
use portainer_models::{Stack, StackFileResponse, StackUpdateRequest};
use serde_json::json;

use crate::errors::RefreshError;
use crate::http::client::HttpClient;

/// Stack operations of the managing API, abstracted for testability
#[async_trait]
pub trait StackApi: Send + Sync {
    /// List stacks, optionally scoped server-side to one endpoint
    async fn list_stacks(&self, endpoint_id: Option<i64>) -> Result<Vec<Stack>, RefreshError>;

    /// Get the detail record of one stack
    async fn get_stack(&self, id: i64) -> Result<Stack, RefreshError>;

    /// Get the deployable content of one stack
    async fn get_stack_file(&self, id: i64) -> Result<StackFileResponse, RefreshError>;

    /// Submit an update for one stack against its owning endpoint
    async fn update_stack(
        &self,
        id: i64,
        endpoint_id: i64,
        request: &StackUpdateRequest,
    ) -> Result<(), RefreshError>;
}

#[async_trait]
impl StackApi for HttpClient {
    async fn list_stacks(&self, endpoint_id: Option<i64>) -> Result<Vec<Stack>, RefreshError> {
        let query = match endpoint_id {
            Some(id) => vec![("filters", json!({ "EndpointID": id }).to_string())],
            None => vec![],
        };
        self.get("/stacks", &query).await
    }

    async fn get_stack(&self, id: i64) -> Result<Stack, RefreshError> {
        let path = format!("/stacks/{}", id);
        self.get(&path, &[]).await
    }

    async fn get_stack_file(&self, id: i64) -> Result<StackFileResponse, RefreshError> {
        let path = format!("/stacks/{}/file", id);
        self.get(&path, &[]).await
    }

    async fn update_stack(
        &self,
        id: i64,
        endpoint_id: i64,
        request: &StackUpdateRequest,
    ) -> Result<(), RefreshError> {
        let path = format!("/stacks/{}", id);
        let query = [("endpointId", endpoint_id.to_string())];
        let timeout = Some(self.options().update_timeout);
        let _: serde_json::Value = self.put(&path, &query, request, timeout).await?;
        Ok(())
    }
}
