//! SoundCloud adapter.
//!
//! Queries the api-v2 search endpoint. A configured client id is used when
//! present; otherwise a built-in list of public client ids is tried in order
//! until one answers, so the adapter works keyless.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::SoundcloudConfig;
use crate::search::{relevance_score, Platform, ProviderError, SearchItem, SearchProvider};

const DEFAULT_BASE_URL: &str = "https://api-v2.soundcloud.com";

/// Public client ids tried when no client id is configured.
const FALLBACK_CLIENT_IDS: [&str; 4] = [
    "2t9loNQH90kzJcsFCODdigxfp325aq4z",
    "a3e059563d7fd3372b49b37f00a00bcf",
    "iZIs9mchVcX5lhVRyQGGAYlNPVldzAoX",
    "c3e059563d7fd3372b49b37f00a00bcf",
];

pub struct SoundcloudProvider {
    client: Client,
    client_ids: Vec<String>,
    base_url: String,
}

impl SoundcloudProvider {
    pub fn new(config: &SoundcloudConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()
            .expect("Failed to create HTTP client");

        let client_ids = match &config.client_id {
            Some(id) => vec![id.clone()],
            None => FALLBACK_CLIENT_IDS.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            client,
            client_ids,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_search_url(&self, client_id: &str, query: &str, limit: usize) -> String {
        format!(
            "{}/search?q={}&limit={}&client_id={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            limit,
            urlencoding::encode(client_id)
        )
    }
}

#[async_trait]
impl SearchProvider for SoundcloudProvider {
    fn platform(&self) -> Platform {
        Platform::Soundcloud
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError> {
        let mut last_error = ProviderError::ConnectionFailed("no client ids".to_string());

        for client_id in &self.client_ids {
            let url = self.build_search_url(client_id, query, limit);
            debug!(query = query, "Searching SoundCloud");

            let response = match self.client.get(&url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = e.into();
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                last_error = ProviderError::ApiStatus {
                    status: status.as_u16(),
                    body: response.text().await.unwrap_or_default().chars().take(200).collect(),
                };
                continue;
            }

            let parsed: ScSearchResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            let items: Vec<SearchItem> = parsed
                .collection
                .into_iter()
                .filter(|entry| entry.kind == "track" && entry.id.is_some())
                .map(|entry| map_track(entry, query))
                .take(limit)
                .collect();

            debug!(results = items.len(), "SoundCloud search complete");
            return Ok(items);
        }

        Err(last_error)
    }
}

fn map_track(entry: ScEntry, query: &str) -> SearchItem {
    let title = entry
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let user = entry.user.unwrap_or_default();
    let artist = user
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let url = entry.permalink_url.clone().unwrap_or_else(|| {
        format!(
            "https://soundcloud.com/{}/{}",
            user.permalink.unwrap_or_default(),
            entry.permalink.unwrap_or_default()
        )
    });
    let embed_url = format!(
        "https://w.soundcloud.com/player/?url={}",
        urlencoding::encode(entry.permalink_url.as_deref().unwrap_or_default())
    );

    SearchItem {
        id: entry.id.unwrap_or(0).to_string(),
        ai_score: relevance_score(&title, &artist, query),
        thumbnail: entry.artwork_url.or(user.avatar_url).unwrap_or_default(),
        duration: format_millis(entry.duration.unwrap_or(0)),
        published_at: entry.created_at.unwrap_or_default(),
        view_count: entry.playback_count.unwrap_or(0),
        description: entry
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} by {}", title, artist)),
        platform: Platform::Soundcloud,
        url,
        embed_url,
        title,
        artist,
    }
}

fn format_millis(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[derive(Debug, Deserialize)]
struct ScSearchResponse {
    #[serde(default)]
    collection: Vec<ScEntry>,
}

#[derive(Debug, Deserialize)]
struct ScEntry {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    permalink_url: Option<String>,
    #[serde(default)]
    artwork_url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    playback_count: Option<u64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    user: Option<ScUser>,
}

#[derive(Debug, Default, Deserialize)]
struct ScUser {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_entry() -> ScEntry {
        ScEntry {
            kind: "track".to_string(),
            id: Some(123456),
            title: Some("Harder Better Faster Stronger".to_string()),
            duration: Some(225_000),
            permalink: Some("harder".to_string()),
            permalink_url: Some("https://soundcloud.com/daftpunk/harder".to_string()),
            artwork_url: Some("https://i1.sndcdn.com/artworks.jpg".to_string()),
            created_at: Some("2010-04-12T08:00:00Z".to_string()),
            playback_count: Some(420_000),
            description: None,
            user: Some(ScUser {
                username: Some("Daft Punk".to_string()),
                permalink: Some("daftpunk".to_string()),
                avatar_url: None,
            }),
        }
    }

    #[test]
    fn test_build_search_url() {
        let provider =
            SoundcloudProvider::new(&SoundcloudConfig::default(), Duration::from_secs(1));
        let url = provider.build_search_url("cid", "daft punk", 12);
        assert!(url.starts_with("https://api-v2.soundcloud.com/search?"));
        assert!(url.contains("q=daft%20punk"));
        assert!(url.contains("limit=12"));
        assert!(url.contains("client_id=cid"));
    }

    #[test]
    fn test_fallback_client_ids_used_when_unconfigured() {
        let provider =
            SoundcloudProvider::new(&SoundcloudConfig::default(), Duration::from_secs(1));
        assert_eq!(provider.client_ids.len(), FALLBACK_CLIENT_IDS.len());

        let config = SoundcloudConfig {
            client_id: Some("mine".to_string()),
            base_url: None,
        };
        let provider = SoundcloudProvider::new(&config, Duration::from_secs(1));
        assert_eq!(provider.client_ids, vec!["mine".to_string()]);
    }

    #[test]
    fn test_map_track() {
        let item = map_track(track_entry(), "daft punk");
        assert_eq!(item.id, "123456");
        assert_eq!(item.artist, "Daft Punk");
        assert_eq!(item.duration, "3:45");
        assert_eq!(item.view_count, 420_000);
        assert_eq!(item.url, "https://soundcloud.com/daftpunk/harder");
        assert!(item
            .embed_url
            .starts_with("https://w.soundcloud.com/player/?url=https%3A%2F%2F"));
        // No upstream description: synthesized fallback.
        assert_eq!(
            item.description,
            "Harder Better Faster Stronger by Daft Punk"
        );
        // Artist substring 30 + artist equality 80.
        assert_eq!(item.ai_score, 110.0);
    }

    #[test]
    fn test_map_track_builds_url_from_permalinks() {
        let mut entry = track_entry();
        entry.permalink_url = None;
        let item = map_track(entry, "x");
        assert_eq!(item.url, "https://soundcloud.com/daftpunk/harder");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "0:00");
        assert_eq!(format_millis(61_000), "1:01");
        assert_eq!(format_millis(3_599_000), "59:59");
    }
}
