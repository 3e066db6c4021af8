//! Batch orchestration of stack refreshes

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::options::BatchOptions;
use crate::deploy::fsm::{RefreshEvent, RefreshFsm};
use crate::deploy::payload;
use crate::deploy::progress::ProgressSink;
use crate::http::stacks::StackApi;
use crate::models::outcome::{RunSummary, UpdateOutcome};
use crate::models::stack::StackSummary;
use crate::stacks::definition::DefinitionFetcher;

/// Refreshes a fixed list of stacks, one at a time
///
/// A failing stack never stops the batch. Stacks are processed strictly in
/// order so that redeploys do not race on the managing API.
pub struct BatchOrchestrator<'a> {
    api: &'a dyn StackApi,
    options: BatchOptions,
    progress: &'a dyn ProgressSink,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(api: &'a dyn StackApi, options: BatchOptions, progress: &'a dyn ProgressSink) -> Self {
        Self {
            api,
            options,
            progress,
        }
    }

    /// Refresh every stack and summarize the outcomes
    pub async fn run(&self, stacks: Vec<StackSummary>) -> RunSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = stacks.len();

        info!(%run_id, "Refreshing {} stacks", total);
        self.progress.batch_started(total);

        let mut outcomes = Vec::with_capacity(total);
        for (index, stack) in stacks.iter().enumerate() {
            if index > 0 && !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }

            self.progress.stack_started(index, total, stack);
            let span = info_span!("stack", id = stack.id, name = %stack.name);
            let outcome = self.refresh(stack).instrument(span).await;
            self.progress.stack_finished(index, total, &outcome);
            outcomes.push(outcome);
        }

        let summary = RunSummary::from_outcomes(run_id, started_at, outcomes);
        info!(
            %run_id,
            "Refresh finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
        self.progress.batch_finished(&summary);
        summary
    }

    /// Fetch, build and submit one stack
    async fn refresh(&self, stack: &StackSummary) -> UpdateOutcome {
        let started = Instant::now();
        let mut fsm = RefreshFsm::new();

        self.step(&mut fsm, stack, RefreshEvent::Fetch);
        let mut fetched = match DefinitionFetcher::new(self.api).fetch(stack.id).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!("Failed to fetch details of stack {}: {}", stack, e);
                self.step(&mut fsm, stack, RefreshEvent::Failed(e.to_string()));
                return UpdateOutcome::failed(stack, &e, None, started.elapsed());
            }
        };
        fetched.definition.summary.fill_missing(stack);
        if let Some(warning) = &fetched.warning {
            self.progress.stack_warning(stack, warning);
        }
        self.step(&mut fsm, stack, RefreshEvent::Fetched);

        let request = payload::build(&fetched.definition);
        debug!(
            "Update payload for stack {}: {}",
            stack,
            serde_json::to_string_pretty(&request).unwrap_or_default()
        );
        self.step(&mut fsm, stack, RefreshEvent::Built);

        // Always the stack's own endpoint, never a run-wide default
        let target = &fetched.definition.summary;
        info!(
            "Updating stack {} on endpoint {} ({})...",
            target, target.endpoint_id, target.kind
        );

        match self.api.update_stack(target.id, target.endpoint_id, &request).await {
            Ok(()) => {
                self.step(&mut fsm, stack, RefreshEvent::Accepted);
                info!("Stack {} re-pulled and redeployed", target);
                UpdateOutcome::succeeded(target, fetched.content_source, started.elapsed())
            }
            Err(e) => {
                error!("Failed to update stack {}: {}", target, e);
                self.step(&mut fsm, stack, RefreshEvent::Failed(e.to_string()));
                UpdateOutcome::failed(
                    target,
                    &e,
                    Some(fetched.content_source),
                    started.elapsed(),
                )
            }
        }
    }

    fn step(&self, fsm: &mut RefreshFsm, stack: &StackSummary, event: RefreshEvent) {
        match fsm.process(event) {
            Ok(state) => {
                debug!("Stack {} is now {}", stack, state);
                self.progress.stack_transition(stack, state);
            }
            Err(e) => error!("Stack {}: {}", stack, e),
        }
    }
}
