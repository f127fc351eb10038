//! Integration tests for the fan-out aggregator over mock providers.

use std::sync::Arc;
use std::time::Duration;

use melodine_core::testing::{fixtures, MockProvider};
use melodine_core::{AggregatedSearch, Aggregator, Platform, ProviderError, SearchProvider};

const DEADLINE: Duration = Duration::from_secs(2);

fn aggregator(providers: Vec<Arc<MockProvider>>) -> Aggregator {
    let providers: Vec<Arc<dyn SearchProvider>> = providers
        .into_iter()
        .map(|p| p as Arc<dyn SearchProvider>)
        .collect();
    Aggregator::new(providers, 12, DEADLINE)
}

fn seeded(platform: Platform, ids: &[&str]) -> Arc<MockProvider> {
    let items = ids
        .iter()
        .map(|id| fixtures::item(platform, id, &format!("Track {}", id), "Artist"))
        .collect();
    Arc::new(MockProvider::with_items(platform, items))
}

#[tokio::test]
async fn test_full_join_concatenates_in_registration_order() {
    let jamendo = seeded(Platform::Jamendo, &["j1", "j2"]);
    let soundcloud = seeded(Platform::Soundcloud, &["s1"]);
    let youtube = seeded(Platform::Youtube, &["y1", "y2"]);

    let result = aggregator(vec![jamendo, soundcloud, youtube])
        .search("anything")
        .await;

    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["j1", "j2", "s1", "y1", "y2"]);
    assert!(result.provider_errors.is_empty());
}

#[tokio::test]
async fn test_failing_providers_do_not_poison_the_rest() {
    let jamendo = seeded(Platform::Jamendo, &["j1"]);
    let soundcloud = seeded(Platform::Soundcloud, &["s1"]);
    soundcloud.set_always_fail(true).await;
    let youtube = seeded(Platform::Youtube, &["y1"]);
    youtube
        .set_next_error(ProviderError::ApiStatus {
            status: 503,
            body: "quota".to_string(),
        })
        .await;

    let result = aggregator(vec![jamendo, soundcloud, youtube])
        .search("anything")
        .await;

    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["j1"]);
    assert_eq!(result.provider_errors.len(), 2);
    assert!(result.provider_errors.contains_key("soundcloud"));
    assert!(result.provider_errors.contains_key("youtube"));
}

#[tokio::test]
async fn test_all_providers_failing_yields_empty_result() {
    let a = seeded(Platform::Jamendo, &["j1"]);
    a.set_always_fail(true).await;
    let b = seeded(Platform::Mixcloud, &["m1"]);
    b.set_always_fail(true).await;

    let result = aggregator(vec![a, b]).search("anything").await;
    assert!(result.items.is_empty());
    assert_eq!(result.provider_errors.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_as_empty_contribution() {
    let fast = seeded(Platform::Jamendo, &["j1"]);
    let slow = seeded(Platform::Mixcloud, &["m1"]);
    slow.set_delay(Duration::from_secs(60)).await;

    let result = aggregator(vec![fast, slow]).search("anything").await;

    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["j1"]);
    assert_eq!(
        result.provider_errors.get("mixcloud").map(String::as_str),
        Some("request timeout")
    );
}

#[tokio::test]
async fn test_missing_credential_is_a_skip_not_an_error() {
    let configured = seeded(Platform::Mixcloud, &["m1"]);
    let unconfigured = seeded(Platform::Youtube, &[]);
    unconfigured
        .set_next_error(ProviderError::MissingCredential("youtube.api_key"))
        .await;

    let result = aggregator(vec![configured, unconfigured])
        .search("anything")
        .await;

    assert_eq!(result.items.len(), 1);
    assert!(result.provider_errors.is_empty());
}

#[tokio::test]
async fn test_query_propagates_verbatim_with_limit() {
    let provider = seeded(Platform::Soundcloud, &["s1"]);
    let result = aggregator(vec![Arc::clone(&provider)])
        .search("daft punk  one more time")
        .await;

    assert_eq!(result.items.len(), 1);
    assert_eq!(
        provider.recorded_queries().await,
        vec!["daft punk  one more time".to_string()]
    );
}

#[tokio::test]
async fn test_no_providers_is_empty_success() {
    let result: AggregatedSearch = aggregator(vec![]).search("anything").await;
    assert!(result.items.is_empty());
    assert!(result.provider_errors.is_empty());
}
