//! Batch orchestration tests

use std::time::Duration;

use portainer_models::Pair;
use portainer_refresher::config::options::BatchOptions;
use portainer_refresher::deploy::orchestrator::BatchOrchestrator;
use portainer_refresher::deploy::progress::NoProgress;
use portainer_refresher::errors::ErrorKind;
use portainer_refresher::models::outcome::ContentSource;

use crate::support::{stack, summary, FakeStackApi, RecordingProgress};

fn no_pacing() -> BatchOptions {
    BatchOptions {
        pacing: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_failure_does_not_stop_the_batch() {
    let stacks = vec![stack(1, "a", 1, 1), stack(2, "b", 1, 1), stack(3, "c", 1, 1)];
    let targets = stacks.iter().map(summary).collect();
    let mut api = FakeStackApi::new(stacks);
    api.unreachable_details.insert(2);

    let summary = BatchOrchestrator::new(&api, no_pacing(), &NoProgress)
        .run(targets)
        .await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.exit_code(), 1);

    let failed = &summary.outcomes[1];
    assert_eq!(failed.stack_id, 2);
    assert!(!failed.success);
    assert_eq!(failed.error.as_ref().map(|e| e.kind), Some(ErrorKind::Transport));

    let updated: Vec<i64> = api.updates().iter().map(|(id, _, _)| *id).collect();
    assert_eq!(updated, vec![1, 3]);
}

#[tokio::test]
async fn test_update_targets_each_stacks_own_endpoint() {
    let stacks = vec![stack(1, "a", 3, 1), stack(2, "b", 7, 1)];
    let targets = stacks.iter().map(summary).collect();
    let api = FakeStackApi::new(stacks);

    let summary = BatchOrchestrator::new(&api, no_pacing(), &NoProgress)
        .run(targets)
        .await;

    assert_eq!(summary.exit_code(), 0);
    let endpoints: Vec<(i64, i64)> = api.updates().iter().map(|(id, ep, _)| (*id, *ep)).collect();
    assert_eq!(endpoints, vec![(1, 3), (2, 7)]);
}

#[tokio::test]
async fn test_sparse_detail_falls_back_to_listed_record() {
    let listed = summary(&stack(1, "web", 3, 1));
    let mut detail = stack(1, "", 0, 1);
    detail.r#type = 0;
    let api = FakeStackApi::new(vec![detail]);

    let summary = BatchOrchestrator::new(&api, no_pacing(), &NoProgress)
        .run(vec![listed])
        .await;

    let outcome = &summary.outcomes[0];
    assert!(outcome.success);
    assert_eq!(outcome.stack_name, "web");
    assert_eq!(outcome.endpoint_id, 3);
    let endpoints: Vec<i64> = api.updates().iter().map(|(_, ep, _)| *ep).collect();
    assert_eq!(endpoints, vec![3]);
}

#[tokio::test]
async fn test_update_preserves_environment_and_prune() {
    let mut record = stack(9, "media", 1, 1);
    record.env = Some(vec![Pair::new("TAG", "2.1"), Pair::new("EMPTY", "")]);
    record.prune_services = None;
    record.option = Some(portainer_models::StackOption { prune: Some(true) });
    let targets = vec![summary(&record)];
    let api = FakeStackApi::new(vec![record]);

    BatchOrchestrator::new(&api, no_pacing(), &NoProgress)
        .run(targets)
        .await;

    let (_, _, request) = api.updates().remove(0);
    assert!(request.pull_image);
    assert!(request.prune_services);
    assert_eq!(
        request.env,
        vec![Pair::new("TAG", "2.1"), Pair::new("EMPTY", "")]
    );
}

#[tokio::test]
async fn test_fallback_content_is_submitted() {
    let mut record = stack(4, "git", 1, 1);
    record.stack_file_content = None;
    let targets = vec![summary(&record)];
    let mut api = FakeStackApi::new(vec![record]);
    api.files.insert(4, "version: '3'\n".to_string());

    let summary = BatchOrchestrator::new(&api, no_pacing(), &NoProgress)
        .run(targets)
        .await;

    assert_eq!(summary.outcomes[0].content_source, Some(ContentSource::Fallback));
    let (_, _, request) = api.updates().remove(0);
    assert_eq!(request.stack_file_content.as_deref(), Some("version: '3'\n"));
}

#[tokio::test]
async fn test_missing_content_still_updates() {
    let mut record = stack(5, "remote", 1, 1);
    record.stack_file_content = None;
    let targets = vec![summary(&record)];
    let api = FakeStackApi::new(vec![record]);
    let progress = RecordingProgress::default();

    let summary = BatchOrchestrator::new(&api, no_pacing(), &progress)
        .run(targets)
        .await;

    assert!(summary.outcomes[0].success);
    assert_eq!(summary.outcomes[0].content_source, Some(ContentSource::Missing));
    let (_, _, request) = api.updates().remove(0);
    assert!(request.stack_file_content.is_none());
    assert!(progress.events().contains(&"5:warning".to_string()));
}

#[tokio::test]
async fn test_rejected_update_is_recorded() {
    let stacks = vec![stack(1, "a", 1, 1)];
    let targets = stacks.iter().map(summary).collect();
    let mut api = FakeStackApi::new(stacks);
    api.rejected_updates.insert(1, 500);

    let summary = BatchOrchestrator::new(&api, no_pacing(), &NoProgress)
        .run(targets)
        .await;

    let outcome = &summary.outcomes[0];
    assert!(!outcome.success);
    assert_eq!(outcome.content_source, Some(ContentSource::Inline));
    let failure = outcome.error.as_ref().unwrap();
    assert_eq!(failure.kind, ErrorKind::Api);
    assert_eq!(failure.status, Some(500));
    assert!(failure.message.contains("Update rejected"));
}

#[tokio::test]
async fn test_progress_events_follow_state_machine() {
    let stacks = vec![stack(1, "a", 1, 1), stack(2, "b", 1, 1)];
    let targets = stacks.iter().map(summary).collect();
    let mut api = FakeStackApi::new(stacks);
    api.unreachable_details.insert(2);
    let progress = RecordingProgress::default();

    BatchOrchestrator::new(&api, no_pacing(), &progress)
        .run(targets)
        .await;

    assert_eq!(
        progress.events(),
        vec![
            "batch:2",
            "start:1/2:1",
            "1:fetching",
            "1:building",
            "1:submitting",
            "1:recorded",
            "finish:1:true",
            "start:2/2:2",
            "2:fetching",
            "2:recorded",
            "finish:2:false",
            "done:1/2",
        ]
    );
}

#[tokio::test]
async fn test_empty_batch() {
    let api = FakeStackApi::new(vec![]);
    let progress = RecordingProgress::default();

    let summary = BatchOrchestrator::new(&api, no_pacing(), &progress)
        .run(vec![])
        .await;

    assert_eq!(summary.total, 0);
    assert_eq!(summary.exit_code(), 0);
    assert!(api.calls().is_empty());
    assert_eq!(progress.events(), vec!["batch:0", "done:0/0"]);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_between_stacks() {
    let stacks = vec![stack(1, "a", 1, 1), stack(2, "b", 1, 1), stack(3, "c", 1, 1)];
    let targets = stacks.iter().map(summary).collect();
    let api = FakeStackApi::new(stacks);
    let options = BatchOptions {
        pacing: Duration::from_millis(250),
    };

    let started = tokio::time::Instant::now();
    BatchOrchestrator::new(&api, options, &NoProgress)
        .run(targets)
        .await;

    assert_eq!(started.elapsed(), Duration::from_millis(500));
}
