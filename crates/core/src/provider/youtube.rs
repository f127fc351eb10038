//! YouTube Data API v3 adapter.
//!
//! Two-step lookup: the search endpoint (music video category) for matching
//! video ids, then the videos endpoint for duration and view statistics.
//! Requires an API key; without one the adapter reports `MissingCredential`
//! without attempting any call.

use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::YoutubeConfig;
use crate::search::{relevance_score, Platform, ProviderError, SearchItem, SearchProvider};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube category id for Music.
const MUSIC_CATEGORY_ID: u32 = 10;

pub struct YoutubeProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl YoutubeProvider {
    pub fn new(config: &YoutubeConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_search_url(&self, api_key: &str, query: &str, limit: usize) -> String {
        format!(
            "{}/search?part=snippet&q={}&type=video&videoCategoryId={}&maxResults={}&order=relevance&key={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            MUSIC_CATEGORY_ID,
            limit,
            urlencoding::encode(api_key)
        )
    }

    fn build_videos_url(&self, api_key: &str, video_ids: &[String]) -> String {
        format!(
            "{}/videos?part=snippet,contentDetails,statistics&id={}&key={}",
            self.base_url.trim_end_matches('/'),
            video_ids.join(","),
            urlencoding::encode(api_key)
        )
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ProviderError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SearchProvider for YoutubeProvider {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential("youtube.api_key"))?;

        debug!(query = query, "Searching YouTube");

        let search: YtSearchResponse = self
            .fetch_json(&self.build_search_url(api_key, query, limit))
            .await?;

        let video_ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.and_then(|id| id.video_id))
            .collect();

        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let videos: YtVideosResponse = self
            .fetch_json(&self.build_videos_url(api_key, &video_ids))
            .await?;

        let items: Vec<SearchItem> = videos
            .items
            .into_iter()
            .filter(|video| !video.id.is_empty())
            .map(|video| map_video(video, query))
            .take(limit)
            .collect();

        debug!(results = items.len(), "YouTube search complete");
        Ok(items)
    }
}

fn map_video(video: YtVideo, query: &str) -> SearchItem {
    let snippet = video.snippet.unwrap_or_default();
    let title = snippet
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let artist = snippet
        .channel_title
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let thumbnails = snippet.thumbnails.unwrap_or_default();
    let thumbnail = thumbnails
        .high
        .or(thumbnails.default)
        .map(|t| t.url)
        .unwrap_or_default();

    let duration = video
        .content_details
        .and_then(|cd| cd.duration)
        .as_deref()
        .map(format_iso8601_duration)
        .unwrap_or_else(|| "0:00".to_string());

    let view_count = video
        .statistics
        .and_then(|s| s.view_count)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    SearchItem {
        ai_score: relevance_score(&title, &artist, query),
        url: format!("https://www.youtube.com/watch?v={}", video.id),
        embed_url: format!("https://www.youtube.com/embed/{}", video.id),
        published_at: snippet.published_at.unwrap_or_default(),
        description: snippet
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} by {}", title, artist)),
        platform: Platform::Youtube,
        id: video.id,
        title,
        artist,
        thumbnail,
        duration,
        view_count,
    }
}

/// Format an ISO-8601 duration (`PT1H2M3S`) as `M:SS` or `H:MM:SS`.
fn format_iso8601_duration(duration: &str) -> String {
    let re = Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap();
    let Some(caps) = re.captures(duration) else {
        return "0:00".to_string();
    };

    let group = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (group(1), group(2), group(3));

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[derive(Debug, Deserialize)]
struct YtSearchResponse {
    #[serde(default)]
    items: Vec<YtSearchItem>,
}

#[derive(Debug, Deserialize)]
struct YtSearchItem {
    #[serde(default)]
    id: Option<YtSearchItemId>,
}

#[derive(Debug, Deserialize)]
struct YtSearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YtVideosResponse {
    #[serde(default)]
    items: Vec<YtVideo>,
}

#[derive(Debug, Deserialize)]
struct YtVideo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: Option<YtSnippet>,
    #[serde(rename = "contentDetails", default)]
    content_details: Option<YtContentDetails>,
    #[serde(default)]
    statistics: Option<YtStatistics>,
}

#[derive(Debug, Default, Deserialize)]
struct YtSnippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "channelTitle", default)]
    channel_title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Option<YtThumbnails>,
}

#[derive(Debug, Default, Deserialize)]
struct YtThumbnails {
    #[serde(default)]
    high: Option<YtThumbnail>,
    #[serde(default)]
    default: Option<YtThumbnail>,
}

#[derive(Debug, Deserialize)]
struct YtThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct YtContentDetails {
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YtStatistics {
    #[serde(rename = "viewCount", default)]
    view_count: Option<String>,
}
