//! Internet Archive adapter (archival audio collections).
//!
//! Keyless. Queries the advanced search endpoint restricted to the audio
//! collection. The search response carries no durations, so items get the
//! `0:00` sentinel, and dates come back in whatever format the uploader used,
//! so `publishedAt` is passed through raw for the pipeline's lenient parser.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::InternetArchiveConfig;
use crate::search::{relevance_score, Platform, ProviderError, SearchItem, SearchProvider};

const DEFAULT_BASE_URL: &str = "https://archive.org";

pub struct InternetArchiveProvider {
    client: Client,
    base_url: String,
}

impl InternetArchiveProvider {
    pub fn new(config: &InternetArchiveConfig, timeout: Duration) -> Self {
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
}

#[async_trait]
impl SearchProvider for InternetArchiveProvider {
    fn platform(&self) -> Platform {
        Platform::InternetArchive
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError> {
        let url = format!(
            "{}/advancedsearch.php",
            self.base_url.trim_end_matches('/')
        );
        debug!(query = query, "Searching Internet Archive");

        // The search index scores better with extra rows requested; truncate
        // after mapping.
        let rows = (limit * 2).to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", format!("collection:audio AND ({})", query).as_str()),
                ("fl[]", "identifier,title,creator,date,description"),
                ("rows", rows.as_str()),
                ("page", "1"),
                ("output", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: IaSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let items: Vec<SearchItem> = parsed
            .response
            .map(|r| r.docs)
            .unwrap_or_default()
            .into_iter()
            .map(|doc| map_doc(doc, query))
            .take(limit)
            .collect();

        debug!(results = items.len(), "Internet Archive search complete");
        Ok(items)
    }
}

fn map_doc(doc: IaDoc, query: &str) -> SearchItem {
    let title = doc
        .title
        .and_then(OneOrMany::into_first)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let artist = doc
        .creator
        .and_then(OneOrMany::into_first)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "Unknown Artist".to_string());
    let description = doc
        .description
        .and_then(OneOrMany::into_first)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("{} by {}", title, artist));

    SearchItem {
        ai_score: relevance_score(&title, &artist, query),
        thumbnail: format!("https://archive.org/services/img/{}", doc.identifier),
        // Search results carry no track length.
        duration: "0:00".to_string(),
        url: format!("https://archive.org/details/{}", doc.identifier),
        embed_url: format!("https://archive.org/embed/{}", doc.identifier),
        published_at: doc.date.unwrap_or_default(),
        view_count: 0,
        platform: Platform::InternetArchive,
        id: doc.identifier,
        title,
        artist,
        description,
    }
}

#[derive(Debug, Deserialize)]
struct IaSearchResponse {
    #[serde(default)]
    response: Option<IaDocs>,
}

#[derive(Debug, Deserialize)]
struct IaDocs {
    #[serde(default)]
    docs: Vec<IaDoc>,
}

#[derive(Debug, Deserialize)]
struct IaDoc {
    identifier: String,
    #[serde(default)]
    title: Option<OneOrMany>,
    #[serde(default)]
    creator: Option<OneOrMany>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<OneOrMany>,
}

/// Archive metadata fields appear as either a string or a list of strings
/// depending on the uploader.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_first(self) -> Option<String> {
        match self {
            OneOrMany::One(s) => Some(s),
            OneOrMany::Many(v) => v.into_iter().next(),
        }
    }
}
