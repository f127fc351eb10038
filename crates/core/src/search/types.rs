//! Types for the music search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Origin platform of a search result.
///
/// One tag per registered provider. The wire representation is the lowercase
/// tag the original platforms are known by (`"internet-archive"` etc.) and is
/// stable: it is both the JSON `platform` field and the value accepted by the
/// `platform` query parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Jamendo,
    Soundcloud,
    Youtube,
    InternetArchive,
    Mixcloud,
}

impl Platform {
    /// All registered platforms, in provider-priority order.
    ///
    /// This order is the order provider contributions are concatenated in by
    /// the aggregator, and therefore the tie-break order for stable sorts.
    pub const ALL: [Platform; 5] = [
        Platform::Jamendo,
        Platform::Soundcloud,
        Platform::Youtube,
        Platform::InternetArchive,
        Platform::Mixcloud,
    ];

    /// Stable lowercase tag for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Jamendo => "jamendo",
            Platform::Soundcloud => "soundcloud",
            Platform::Youtube => "youtube",
            Platform::InternetArchive => "internet-archive",
            Platform::Mixcloud => "mixcloud",
        }
    }

    /// Parse a platform tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Platform> {
        match tag {
            "jamendo" => Some(Platform::Jamendo),
            "soundcloud" => Some(Platform::Soundcloud),
            "youtube" => Some(Platform::Youtube),
            "internet-archive" => Some(Platform::InternetArchive),
            "mixcloud" => Some(Platform::Mixcloud),
            _ => None,
        }
    }

    /// URL substrings that mark an item as belonging to this platform.
    ///
    /// The validity filter only admits items whose URL contains at least one
    /// marker of at least one registered platform.
    pub fn domain_markers(&self) -> &'static [&'static str] {
        match self {
            Platform::Jamendo => &["jamendo.com"],
            Platform::Soundcloud => &["soundcloud.com"],
            Platform::Youtube => &["youtube.com", "youtu.be"],
            Platform::InternetArchive => &["archive.org"],
            Platform::Mixcloud => &["mixcloud.com"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical, normalized search result unit.
///
/// Every provider adapter maps its own ad hoc response shape into this
/// struct, applying the documented fallbacks for missing fields. Items are
/// immutable once constructed; the pipeline only re-orders and filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    /// Provider-local identifier. Unique per platform only.
    pub id: String,
    /// Human-readable name. Providers fall back to "Unknown".
    pub title: String,
    /// Performing artist / channel / uploader. Fallback "Unknown Artist".
    pub artist: String,
    /// Artwork URL, possibly empty.
    #[serde(default)]
    pub thumbnail: String,
    /// Human-formatted duration (`M:SS` or `H:MM:SS`), or a sentinel such as
    /// `"Live Stream"` for non-file sources.
    #[serde(default)]
    pub duration: String,
    /// Canonical link to the item on its origin platform.
    pub url: String,
    /// Player-widget or embed URL, possibly empty.
    #[serde(default)]
    pub embed_url: String,
    /// ISO-8601 timestamp or provider-native date string. Unparseable or
    /// missing values sort as epoch zero.
    #[serde(default)]
    pub published_at: String,
    /// Plays/views/listeners. Missing values are zero.
    #[serde(default)]
    pub view_count: u64,
    /// Free-text description; providers synthesize "`title` by `artist`"
    /// when the upstream record has none.
    #[serde(default)]
    pub description: String,
    /// Origin platform tag.
    pub platform: Platform,
    /// Relevance score against the search query (see `search::score`).
    #[serde(default)]
    pub ai_score: f64,
}

/// Plain-mode sort key. Unknown values fall back to `Relevance`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Relevance,
    Newest,
    Popularity,
    PublicDomain,
}

impl SortBy {
    /// Parse the `sortBy` query parameter. Anything unrecognized means
    /// relevance ordering.
    pub fn parse(raw: &str) -> SortBy {
        match raw {
            "newest" => SortBy::Newest,
            "popularity" => SortBy::Popularity,
            "publicDomain" => SortBy::PublicDomain,
            _ => SortBy::Relevance,
        }
    }
}

/// Platform filter from the `platform` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    /// No filtering (`platform=all`, the default).
    #[default]
    All,
    /// Keep only items from one platform.
    Only(Platform),
    /// An unrecognized tag was requested; matches nothing.
    Unknown,
}

impl PlatformFilter {
    pub fn parse(raw: &str) -> PlatformFilter {
        if raw == "all" {
            PlatformFilter::All
        } else {
            Platform::from_tag(raw)
                .map(PlatformFilter::Only)
                .unwrap_or(PlatformFilter::Unknown)
        }
    }

    pub fn matches(&self, platform: Platform) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(p) => *p == platform,
            PlatformFilter::Unknown => false,
        }
    }
}

/// Caller-selected ranking parameters for one search request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Curated mode: top 3 by score, returned in random order.
    pub ai_mode: bool,
    /// Plain-mode sort key; ignored when `ai_mode` is set.
    pub sort_by: SortBy,
    pub platform: PlatformFilter,
}

/// Errors a provider adapter can surface.
///
/// None of these reach the caller of the aggregator: they are absorbed at the
/// fan-in and turned into an empty contribution for that provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("credential not configured: {0}")]
    MissingCredential(&'static str),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("API error: HTTP {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("request timeout")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            ProviderError::Parse(e.to_string())
        } else {
            ProviderError::ConnectionFailed(e.to_string())
        }
    }
}

/// Trait for provider adapters.
///
/// `search` is one evaluation per call: it performs the provider request,
/// maps the response into `SearchItem`s with the documented field fallbacks,
/// and truncates to at most `limit` items. Implementations must never block
/// indefinitely; each carries a bounded HTTP timeout.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// The platform this adapter queries.
    fn platform(&self) -> Platform;

    /// Execute one search against the provider.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchItem>, ProviderError>;
}
