//! Jamendo adapter (royalty-free music catalog).
//!
//! Uses the v3.0 tracks endpoint. Requires a client id; without one the
//! adapter reports `MissingCredential` without attempting the call.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::JamendoConfig;
use crate::search::{relevance_score, Platform, ProviderError, SearchItem, SearchProvider};

const DEFAULT_BASE_URL: &str = "https://api.jamendo.com/v3.0";

pub struct JamendoProvider {
    client: Client,
    client_id: Option<String>,
    base_url: String,
}

impl JamendoProvider {
    pub fn new(config: &JamendoConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            client_id: config.client_id.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_search_url(&self, client_id: &str, query: &str, limit: usize) -> String {
        format!(
            "{}/tracks/?client_id={}&format=json&limit={}&search={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(client_id),
            limit,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl SearchProvider for JamendoProvider {
    fn platform(&self) -> Platform {
        Platform::Jamendo
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ProviderError::MissingCredential("jamendo.client_id"))?;

        let url = self.build_search_url(client_id, query, limit);
        debug!(query = query, "Searching Jamendo");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: JamendoResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let items: Vec<SearchItem> = parsed
            .results
            .into_iter()
            .map(|track| map_track(track, query))
            .take(limit)
            .collect();

        debug!(results = items.len(), "Jamendo search complete");
        Ok(items)
    }
}

fn map_track(track: JamendoTrack, query: &str) -> SearchItem {
    let title = non_empty(track.name, "Unknown");
    let artist = non_empty(track.artist_name, "Unknown Artist");
    let url = track
        .shareurl
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| format!("https://www.jamendo.com/track/{}", track.id));

    SearchItem {
        ai_score: relevance_score(&title, &artist, query),
        thumbnail: track.album_image.or(track.image).unwrap_or_default(),
        duration: format_seconds(track.duration.unwrap_or(0)),
        embed_url: format!("https://widget.jamendo.com/v3/track/{}", track.id),
        published_at: track.releasedate.unwrap_or_default(),
        view_count: 0,
        description: format!("{} by {}", title, artist),
        platform: Platform::Jamendo,
        id: track.id,
        title,
        artist,
        url,
    }
}

fn non_empty(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn format_seconds(total: u64) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Deserialize)]
struct JamendoResponse {
    #[serde(default)]
    results: Vec<JamendoTrack>,
}

#[derive(Debug, Deserialize)]
struct JamendoTrack {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    album_image: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    shareurl: Option<String>,
    #[serde(default)]
    releasedate: Option<String>,
}
