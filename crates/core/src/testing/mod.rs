//! Testing utilities and mock implementations.
//!
//! Provides a mock `SearchProvider` and item fixtures so the aggregator and
//! pipeline can be exercised end to end without touching any real platform.
//!
//! # Example
//!
//! ```rust,ignore
//! use melodine_core::testing::{fixtures, MockProvider};
//! use melodine_core::{Aggregator, Platform};
//!
//! let provider = MockProvider::new(Platform::Youtube);
//! provider.set_items(vec![
//!     fixtures::item(Platform::Youtube, "v1", "One More Time", "Daft Punk"),
//! ]).await;
//!
//! let aggregator = Aggregator::new(vec![Arc::new(provider)], 12, deadline);
//! let result = aggregator.search("daft punk").await;
//! assert_eq!(result.items.len(), 1);
//! ```

mod mock_provider;

pub use mock_provider::MockProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::search::{Platform, SearchItem};

    /// Create a test item with reasonable defaults and a valid platform URL.
    pub fn item(platform: Platform, id: &str, title: &str, artist: &str) -> SearchItem {
        let domain = platform.domain_markers()[0];
        SearchItem {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            thumbnail: format!("https://www.{}/img/{}.jpg", domain, id),
            duration: "3:30".to_string(),
            url: format!("https://www.{}/items/{}", domain, id),
            embed_url: format!("https://www.{}/embed/{}", domain, id),
            published_at: "2022-01-01T00:00:00Z".to_string(),
            view_count: 0,
            description: format!("{} by {}", title, artist),
            platform,
            ai_score: 0.0,
        }
    }

    /// Create a test item with a fixed relevance score.
    pub fn scored_item(platform: Platform, id: &str, ai_score: f64) -> SearchItem {
        let mut item = item(platform, id, "Scored Item", "Test Artist");
        item.ai_score = ai_score;
        item
    }

    /// Create an item whose URL is an authentication wall; the validity
    /// filter must drop it.
    pub fn login_walled_item(platform: Platform, id: &str) -> SearchItem {
        let mut item = item(platform, id, "Walled", "Test Artist");
        item.url = format!(
            "https://www.{}/login?next=/items/{}",
            platform.domain_markers()[0],
            id
        );
        item
    }

    /// Create an item hosted somewhere no registered platform knows about.
    pub fn offsite_item(platform: Platform, id: &str) -> SearchItem {
        let mut item = item(platform, id, "Offsite", "Test Artist");
        item.url = format!("https://example.com/items/{}", id);
        item
    }
}
