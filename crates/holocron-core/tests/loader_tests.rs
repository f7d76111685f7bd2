mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{planet_page, FakeSource, BASE};
use holocron_api::{ApiError, Planet, Resource, ResourceKind};
use holocron_core::{
    CancelScope, Error, ListConfig, LoadOutcome, LoadState, PagedList, SkipReason,
};
use tokio::sync::Semaphore;

fn planets(source: FakeSource) -> (Arc<FakeSource>, PagedList<Planet, Arc<FakeSource>>) {
    let source = Arc::new(source);
    let list = PagedList::new(source.clone(), &ListConfig::default());
    (source, list)
}

fn ids(items: &[Planet]) -> Vec<String> {
    items.iter().map(|p| p.display_id().to_string()).collect()
}

fn two_pages() -> FakeSource {
    FakeSource::new()
        .with_page(ResourceKind::Planet, 1, planet_page(1, 1, 10, 60, true))
        .with_page(ResourceKind::Planet, 2, planet_page(2, 11, 10, 60, true))
}

// ============================================================================
// start()
// ============================================================================

#[tokio::test]
async fn test_start_loads_first_page() {
    let (source, list) = planets(two_pages());
    assert_eq!(list.state(), LoadState::Idle);

    let outcome = list.start().await.unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(10));
    assert_eq!(list.state(), LoadState::Ready);
    assert_eq!(list.count(), 60);
    assert_eq!(list.items().len(), 10);
    assert_eq!(list.next(), Some(format!("{}/planets/?page=2", BASE)));
    assert_eq!(source.page_calls(), 1);
}

#[tokio::test]
async fn test_start_only_runs_from_idle() {
    let (source, list) = planets(two_pages());
    list.start().await.unwrap();

    let again = list.start().await.unwrap();
    assert_eq!(again, LoadOutcome::Skipped(SkipReason::NotReady));
    assert_eq!(source.page_calls(), 1);
}

#[tokio::test]
async fn test_first_page_failure_moves_to_failed() {
    let (_, list) = planets(FakeSource::new());

    let err = list.start().await.unwrap_err();

    assert!(matches!(err, Error::Api(ApiError::NotFound(_))));
    assert_eq!(list.state(), LoadState::Failed(err.user_message()));
    assert!(list.items().is_empty());
}

// ============================================================================
// load_more()
// ============================================================================

#[tokio::test]
async fn test_load_more_appends_next_page_in_order() {
    let (source, list) = planets(two_pages());
    list.start().await.unwrap();

    let outcome = list.load_more(6).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(10));
    let expected: Vec<String> = (1..=20).map(|id| id.to_string()).collect();
    assert_eq!(ids(&list.items()), expected);
    assert_eq!(list.next(), Some(format!("{}/planets/?page=3", BASE)));
    assert_eq!(list.pages_loaded(), 2);
    assert_eq!(source.page_calls(), 2);
}

#[tokio::test]
async fn test_load_more_outside_window_is_noop() {
    let (source, list) = planets(two_pages());
    list.start().await.unwrap();

    assert_eq!(
        list.load_more(4).await.unwrap(),
        LoadOutcome::Skipped(SkipReason::OutsideWindow)
    );
    assert_eq!(list.items().len(), 10);
    assert_eq!(source.page_calls(), 1);

    // Index 5 is the first one inside the default window of 5
    assert_eq!(list.load_more(5).await.unwrap(), LoadOutcome::Loaded(10));
}

#[tokio::test]
async fn test_custom_prefetch_window() {
    let source = Arc::new(two_pages());
    let list: PagedList<Planet, _> =
        PagedList::new(source.clone(), &ListConfig { prefetch_window: 1 });
    list.start().await.unwrap();

    assert_eq!(
        list.load_more(8).await.unwrap(),
        LoadOutcome::Skipped(SkipReason::OutsideWindow)
    );
    assert_eq!(list.load_more(9).await.unwrap(), LoadOutcome::Loaded(10));
}

#[tokio::test]
async fn test_load_more_before_start_is_noop() {
    let (source, list) = planets(two_pages());

    assert_eq!(
        list.load_more(0).await.unwrap(),
        LoadOutcome::Skipped(SkipReason::NotReady)
    );
    assert_eq!(source.page_calls(), 0);
}

#[tokio::test]
async fn test_last_page_is_terminal() {
    let source = FakeSource::new()
        .with_page(ResourceKind::Planet, 1, planet_page(1, 1, 10, 15, true))
        .with_page(ResourceKind::Planet, 2, planet_page(2, 11, 5, 15, false));
    let (source, list) = planets(source);
    list.start().await.unwrap();
    list.load_more(9).await.unwrap();

    assert_eq!(list.next(), None);
    assert_eq!(
        list.load_more(14).await.unwrap(),
        LoadOutcome::Skipped(SkipReason::Exhausted)
    );
    assert_eq!(list.state(), LoadState::Ready);
    assert_eq!(list.items().len(), 15);
    assert_eq!(source.page_calls(), 2);
}

#[tokio::test]
async fn test_overlapping_pages_are_not_deduplicated() {
    let source = FakeSource::new()
        .with_page(ResourceKind::Planet, 1, planet_page(1, 1, 10, 20, true))
        .with_page(ResourceKind::Planet, 2, planet_page(2, 10, 10, 20, false));
    let (_, list) = planets(source);
    list.start().await.unwrap();
    list.load_more(9).await.unwrap();

    let items = ids(&list.items());
    assert_eq!(items.len(), 20);
    assert_eq!(items.iter().filter(|id| *id == "10").count(), 2);
}

#[tokio::test]
async fn test_page_failure_keeps_loaded_items() {
    let source = FakeSource::new()
        .with_page(ResourceKind::Planet, 1, planet_page(1, 1, 10, 60, true));
    let (_, list) = planets(source);
    list.start().await.unwrap();

    let err = list.load_more(9).await.unwrap_err();

    assert!(matches!(list.state(), LoadState::Failed(msg) if msg == err.user_message()));
    assert_eq!(list.items().len(), 10);
    assert_eq!(
        list.load_more(9).await.unwrap(),
        LoadOutcome::Skipped(SkipReason::NotReady)
    );
}

#[tokio::test]
async fn test_concurrent_triggers_issue_one_request() {
    let gate = Arc::new(Semaphore::new(1));
    let source = Arc::new(two_pages().with_page_gate(gate.clone()));
    let list = Arc::new(PagedList::<Planet, _>::new(
        source.clone(),
        &ListConfig::default(),
    ));
    list.start().await.unwrap();

    // Page 2 will block on the gate until we add a permit
    let first = tokio::spawn({
        let list = list.clone();
        async move { list.load_more(8).await }
    });
    while source.page_calls() < 2 {
        tokio::task::yield_now().await;
    }
    assert!(list.is_loading());

    let second = list.load_more(9).await.unwrap();
    assert_eq!(second, LoadOutcome::Skipped(SkipReason::InFlight));
    assert_eq!(source.page_calls(), 2);

    gate.add_permits(1);
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, LoadOutcome::Loaded(10));
    assert_eq!(list.items().len(), 20);
    assert_eq!(source.page_calls(), 2);
}

#[tokio::test]
async fn test_dropped_load_more_returns_to_ready() {
    let gate = Arc::new(Semaphore::new(1));
    let source = Arc::new(two_pages().with_page_gate(gate.clone()));
    let list = PagedList::<Planet, _>::new(source.clone(), &ListConfig::default());
    list.start().await.unwrap();

    // Page 2 never gets a permit, so the caller gives up on it
    let abandoned = tokio::time::timeout(Duration::from_millis(20), list.load_more(9)).await;
    assert!(abandoned.is_err());
    assert_eq!(list.state(), LoadState::Ready);
    assert_eq!(list.items().len(), 10);

    gate.add_permits(1);
    assert_eq!(list.load_more(9).await.unwrap(), LoadOutcome::Loaded(10));
    assert_eq!(list.items().len(), 20);
    assert_eq!(source.page_calls(), 3);
}

#[tokio::test]
async fn test_dropped_start_returns_to_idle() {
    let gate = Arc::new(Semaphore::new(0));
    let source = Arc::new(two_pages().with_page_gate(gate.clone()));
    let list = PagedList::<Planet, _>::new(source.clone(), &ListConfig::default());

    let abandoned = tokio::time::timeout(Duration::from_millis(20), list.start()).await;
    assert!(abandoned.is_err());
    assert_eq!(list.state(), LoadState::Idle);

    gate.add_permits(1);
    assert_eq!(list.start().await.unwrap(), LoadOutcome::Loaded(10));
    assert_eq!(list.state(), LoadState::Ready);
}

// ============================================================================
// Search interaction
// ============================================================================

#[tokio::test]
async fn test_active_query_filters_and_suppresses_paging() {
    let (source, list) = planets(two_pages());
    list.start().await.unwrap();

    list.set_query("planet 1");
    let visible = ids(&list.visible());
    assert_eq!(visible, vec!["1", "10"]);
    assert_eq!(list.items().len(), 10);

    assert_eq!(
        list.load_more(9).await.unwrap(),
        LoadOutcome::Skipped(SkipReason::Filtering)
    );
    assert_eq!(source.page_calls(), 1);

    list.set_query("");
    assert_eq!(list.visible().len(), 10);
    assert_eq!(list.load_more(9).await.unwrap(), LoadOutcome::Loaded(10));
}

#[tokio::test]
async fn test_visible_image_url_follows_the_filter() {
    let (_, list) = planets(two_pages());
    list.start().await.unwrap();
    list.set_query("planet 7");

    assert_eq!(
        list.visible_image_url(0, "https://img.test/assets"),
        Some("https://img.test/assets/planets/7.jpg".to_string())
    );
    assert_eq!(list.visible_image_url(1, "https://img.test/assets"), None);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancelled_list_discards_arriving_page() {
    let source = Arc::new(two_pages());
    let scope = CancelScope::new();
    let list: PagedList<Planet, _> =
        PagedList::with_cancel(source.clone(), &ListConfig::default(), scope.clone());
    list.start().await.unwrap();

    scope.cancel();
    let err = list.load_more(9).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(list.items().len(), 10);
    assert!(matches!(list.state(), LoadState::Failed(_)));
}
