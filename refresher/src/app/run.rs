//! End-to-end refresh run

use tracing::info;

use crate::config::options::RefreshOptions;
use crate::deploy::orchestrator::BatchOrchestrator;
use crate::deploy::progress::ProgressSink;
use crate::errors::RefreshError;
use crate::http::client::HttpClient;
use crate::models::outcome::RunSummary;
use crate::stacks::catalog::StackCatalog;

/// Run a complete refresh
///
/// Errors returned here are fatal to the run: missing credentials, failed
/// authentication, or a failed stack listing. Per-stack failures are part of
/// the returned summary instead.
pub async fn run(
    options: RefreshOptions,
    progress: &dyn ProgressSink,
) -> Result<RunSummary, RefreshError> {
    let RefreshOptions {
        base_url,
        credentials,
        filter,
        http,
        batch,
    } = options;

    let credential = credentials.resolve()?;

    info!("Connecting to {}", base_url);
    let mut client = HttpClient::new(&base_url, &http)?;
    client.authenticate(credential).await?;

    let stacks = StackCatalog::new(&client).list(&filter).await?;

    let orchestrator = BatchOrchestrator::new(&client, batch, progress);
    Ok(orchestrator.run(stacks).await)
}
