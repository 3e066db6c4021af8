//! Stack catalog tests

use portainer_refresher::stacks::catalog::{StackCatalog, StackFilter};
use tokio_test::assert_ok;

use crate::support::{stack, Call, FakeStackApi};

fn ids(stacks: &[portainer_refresher::models::stack::StackSummary]) -> Vec<i64> {
    stacks.iter().map(|s| s.id).collect()
}

#[tokio::test]
async fn test_list_scopes_listing_to_endpoint() {
    let api = FakeStackApi::new(vec![stack(1, "web", 2, 1), stack(2, "db", 3, 1)]);
    let filter = StackFilter {
        endpoint_id: Some(2),
        ..Default::default()
    };

    let stacks = assert_ok!(StackCatalog::new(&api).list(&filter).await);

    assert_eq!(ids(&stacks), vec![1]);
    assert_eq!(api.calls(), vec![Call::List(Some(2))]);
}

#[tokio::test]
async fn test_list_without_filter_returns_everything_in_order() {
    let api = FakeStackApi::new(vec![
        stack(3, "c", 1, 1),
        stack(1, "a", 2, 2),
        stack(2, "b", 1, 1),
    ]);

    let stacks = assert_ok!(StackCatalog::new(&api).list(&StackFilter::default()).await);

    assert_eq!(ids(&stacks), vec![3, 1, 2]);
    assert_eq!(api.calls(), vec![Call::List(None)]);
}

#[tokio::test]
async fn test_identifier_matches_id_or_name() {
    let api = FakeStackApi::new(vec![
        stack(10, "web", 1, 1),
        stack(11, "db", 1, 1),
        stack(12, "10", 1, 1),
    ]);
    let catalog = StackCatalog::new(&api);

    let by_id = StackFilter {
        identifier: Some("10".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&catalog.list(&by_id).await.unwrap()), vec![10]);

    let by_name = StackFilter {
        identifier: Some("db".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&catalog.list(&by_name).await.unwrap()), vec![11]);

    let unknown = StackFilter {
        identifier: Some("99".to_string()),
        ..Default::default()
    };
    assert!(catalog.list(&unknown).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_numeric_identifier_is_an_id_lookup_only() {
    let api = FakeStackApi::new(vec![stack(1, "web", 2, 1), stack(2, "1", 1, 1)]);
    let catalog = StackCatalog::new(&api);

    let scoped = StackFilter {
        identifier: Some("1".to_string()),
        endpoint_id: Some(1),
        only_active: false,
    };
    assert!(assert_ok!(catalog.list(&scoped).await).is_empty());

    let absent = StackFilter {
        identifier: Some("7".to_string()),
        ..Default::default()
    };
    let api = FakeStackApi::new(vec![stack(5, "7", 1, 1)]);
    assert!(assert_ok!(StackCatalog::new(&api).list(&absent).await).is_empty());
}

#[tokio::test]
async fn test_only_active_skips_stopped_stacks() {
    let api = FakeStackApi::new(vec![
        stack(1, "a", 1, 1),
        stack(2, "b", 1, 2),
        stack(3, "c", 1, 1),
    ]);
    let filter = StackFilter {
        only_active: true,
        ..Default::default()
    };

    let stacks = StackCatalog::new(&api).list(&filter).await.unwrap();
    assert_eq!(ids(&stacks), vec![1, 3]);
}

#[tokio::test]
async fn test_disjoint_filters_yield_empty_list() {
    let api = FakeStackApi::new(vec![stack(1, "web", 1, 1), stack(2, "db", 2, 2)]);
    let filter = StackFilter {
        identifier: Some("db".to_string()),
        endpoint_id: None,
        only_active: true,
    };

    let stacks = assert_ok!(StackCatalog::new(&api).list(&filter).await);
    assert!(stacks.is_empty());
}
