//! Mock search provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::search::{Platform, ProviderError, SearchItem, SearchProvider};

/// Mock implementation of the `SearchProvider` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable items (truncated to the requested limit)
/// - Track search queries for assertions
/// - Simulate one-shot or persistent failures and slow responses
pub struct MockProvider {
    platform: Platform,
    items: Arc<RwLock<Vec<SearchItem>>>,
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search fails with this error (consumed on use).
    next_error: Arc<RwLock<Option<ProviderError>>>,
    /// If set, every search fails with a connection error.
    always_fail: Arc<RwLock<bool>>,
    /// Artificial response delay, for timeout tests.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockProvider {
    /// Create a new mock provider for the given platform with no items.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            items: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            always_fail: Arc::new(RwLock::new(false)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock provider with predefined items.
    pub fn with_items(platform: Platform, items: Vec<SearchItem>) -> Self {
        let mut provider = Self::new(platform);
        provider.items = Arc::new(RwLock::new(items));
        provider
    }

    /// Set the items returned by subsequent searches.
    pub async fn set_items(&self, items: Vec<SearchItem>) {
        *self.items.write().await = items;
    }

    /// Add a single item.
    pub async fn add_item(&self, item: SearchItem) {
        self.items.write().await.push(item);
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every search fail with a connection error.
    pub async fn set_always_fail(&self, fail: bool) {
        *self.always_fail.write().await = fail;
    }

    /// Delay every response by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Queries recorded so far.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError> {
        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if *self.always_fail.read().await {
            return Err(ProviderError::ConnectionFailed(
                "mock provider failure".to_string(),
            ));
        }

        self.queries.write().await.push(query.to_string());

        let items = self.items.read().await;
        Ok(items.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_returns_configured_items_up_to_limit() {
        let provider = MockProvider::new(Platform::Youtube);
        provider
            .set_items(vec![
                fixtures::item(Platform::Youtube, "1", "One", "A"),
                fixtures::item(Platform::Youtube, "2", "Two", "A"),
                fixtures::item(Platform::Youtube, "3", "Three", "A"),
            ])
            .await;

        let items = provider.search("anything", 2).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
    }

    #[tokio::test]
    async fn test_records_queries() {
        let provider = MockProvider::new(Platform::Mixcloud);
        provider.search("first", 10).await.unwrap();
        provider.search("second", 10).await.unwrap();

        assert_eq!(provider.search_count().await, 2);
        assert_eq!(
            provider.recorded_queries().await,
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let provider = MockProvider::new(Platform::Jamendo);
        provider
            .set_next_error(ProviderError::Timeout)
            .await;

        assert!(provider.search("q", 10).await.is_err());
        assert!(provider.search("q", 10).await.is_ok());
    }

    #[tokio::test]
    async fn test_always_fail() {
        let provider = MockProvider::new(Platform::Soundcloud);
        provider.set_always_fail(true).await;

        assert!(provider.search("q", 10).await.is_err());
        assert!(provider.search("q", 10).await.is_err());

        provider.set_always_fail(false).await;
        assert!(provider.search("q", 10).await.is_ok());
    }
}
