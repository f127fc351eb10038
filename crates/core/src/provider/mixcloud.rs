//! Mixcloud adapter (streaming mixes / cloudcasts).
//!
//! Keyless. The only adapter that folds a popularity bonus into its score:
//! heavily played mixes get up to 20 base points before the shared additive
//! rule.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::MixcloudConfig;
use crate::search::{
    popularity_bonus, relevance_score, Platform, ProviderError, SearchItem, SearchProvider,
};

const DEFAULT_BASE_URL: &str = "https://api.mixcloud.com";

pub struct MixcloudProvider {
    client: Client,
    base_url: String,
}

impl MixcloudProvider {
    pub fn new(config: &MixcloudConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/search/?q={}&type=cloudcast&limit={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            limit
        )
    }
}

#[async_trait]
impl SearchProvider for MixcloudProvider {
    fn platform(&self) -> Platform {
        Platform::Mixcloud
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError> {
        let url = self.build_search_url(query, limit);
        debug!(query = query, "Searching Mixcloud");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: McSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let items: Vec<SearchItem> = parsed
            .data
            .into_iter()
            .map(|cast| map_cloudcast(cast, query))
            .take(limit)
            .collect();

        debug!(results = items.len(), "Mixcloud search complete");
        Ok(items)
    }
}

fn map_cloudcast(cast: McCloudcast, query: &str) -> SearchItem {
    let title = cast
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let user = cast.user.unwrap_or_default();
    let artist = user
        .name
        .or(user.username)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let key = cast.key.or(cast.slug).unwrap_or_default();
    let play_count = cast.play_count.unwrap_or(0);
    let pictures = cast.pictures.unwrap_or_default();

    SearchItem {
        ai_score: popularity_bonus(play_count) + relevance_score(&title, &artist, query),
        thumbnail: pictures
            .large
            .or(pictures.medium)
            .or(pictures.thumbnail)
            .unwrap_or_default(),
        duration: format_seconds(cast.audio_length.unwrap_or(0)),
        url: cast
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://www.mixcloud.com{}", key)),
        embed_url: format!(
            "https://www.mixcloud.com/widget/iframe/?hide_cover=1&feed={}",
            urlencoding::encode(&key)
        ),
        published_at: cast.created_time.unwrap_or_default(),
        view_count: play_count,
        description: cast
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} by {}", title, artist)),
        platform: Platform::Mixcloud,
        id: key,
        title,
        artist,
    }
}

fn format_seconds(total: u64) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Deserialize)]
struct McSearchResponse {
    #[serde(default)]
    data: Vec<McCloudcast>,
}

#[derive(Debug, Deserialize)]
struct McCloudcast {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    audio_length: Option<u64>,
    #[serde(default)]
    created_time: Option<String>,
    #[serde(default)]
    play_count: Option<u64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    user: Option<McUser>,
    #[serde(default)]
    pictures: Option<McPictures>,
}

#[derive(Debug, Default, Deserialize)]
struct McUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct McPictures {
    #[serde(default)]
    large: Option<String>,
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloudcast() -> McCloudcast {
        McCloudcast {
            key: Some("/djset/deep-house-vol-1/".to_string()),
            slug: Some("deep-house-vol-1".to_string()),
            name: Some("Deep House Vol 1".to_string()),
            url: Some("https://www.mixcloud.com/djset/deep-house-vol-1/".to_string()),
            audio_length: Some(3725),
            created_time: Some("2021-03-01T12:00:00Z".to_string()),
            play_count: Some(50_000),
            description: None,
            user: Some(McUser {
                name: Some("DJ Set".to_string()),
                username: Some("djset".to_string()),
            }),
            pictures: Some(McPictures {
                large: None,
                medium: Some("https://thumbnailer.mixcloud.com/m.jpg".to_string()),
                thumbnail: Some("https://thumbnailer.mixcloud.com/t.jpg".to_string()),
            }),
        }
    }

    #[test]
    fn test_build_search_url() {
        let provider = MixcloudProvider::new(&MixcloudConfig::default(), Duration::from_secs(1));
        let url = provider.build_search_url("deep house", 12);
        assert!(url.starts_with("https://api.mixcloud.com/search/?"));
        assert!(url.contains("q=deep%20house"));
        assert!(url.contains("type=cloudcast"));
        assert!(url.contains("limit=12"));
    }

    #[test]
    fn test_map_cloudcast() {
        let item = map_cloudcast(cloudcast(), "deep house");
        assert_eq!(item.id, "/djset/deep-house-vol-1/");
        assert_eq!(item.artist, "DJ Set");
        assert_eq!(item.duration, "62:05");
        assert_eq!(item.view_count, 50_000);
        assert_eq!(
            item.url,
            "https://www.mixcloud.com/djset/deep-house-vol-1/"
        );
        assert!(item
            .embed_url
            .contains("feed=%2Fdjset%2Fdeep-house-vol-1%2F"));
        assert_eq!(item.thumbnail, "https://thumbnailer.mixcloud.com/m.jpg");
        assert_eq!(item.description, "Deep House Vol 1 by DJ Set");
        // Popularity cap 20 + title substring 50 + 2 word matches.
        assert_eq!(item.ai_score, 20.0 + 50.0 + 20.0);
    }

    #[test]
    fn test_map_cloudcast_builds_url_from_key() {
        let mut cast = cloudcast();
        cast.url = None;
        let item = map_cloudcast(cast, "x");
        assert_eq!(
            item.url,
            "https://www.mixcloud.com/djset/deep-house-vol-1/"
        );
    }

    #[test]
    fn test_popularity_bonus_scales_below_cap() {
        let mut cast = cloudcast();
        cast.play_count = Some(1500);
        cast.name = Some("Nothing Matching".to_string());
        let item = map_cloudcast(cast, "zzz");
        assert_eq!(item.ai_score, 1.5);
    }
}
