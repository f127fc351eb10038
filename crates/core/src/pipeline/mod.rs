//! Filter/sort/selection pipeline.
//!
//! Turns the aggregator's raw concatenated item list into the final ordered
//! result set: a validity filter against known platform domains, an optional
//! platform filter, then mode-dependent selection. Curated ("AI") mode keeps
//! the top 3 by score and shuffles them; plain mode applies the caller's sort
//! key. All sorts are stable, so ties keep the provider-priority order the
//! aggregator established.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::search::{Platform, SearchItem, SearchOptions, SortBy};

/// Curated mode returns at most this many items.
pub const CURATED_RESULT_COUNT: usize = 3;

/// Run the full pipeline with a thread-local RNG for the curated shuffle.
pub fn process(items: Vec<SearchItem>, options: &SearchOptions) -> Vec<SearchItem> {
    process_with_rng(items, options, &mut rand::thread_rng())
}

/// Run the full pipeline with a caller-supplied RNG.
///
/// Only curated mode consumes randomness; plain mode is deterministic for a
/// given input order.
pub fn process_with_rng<R: Rng + ?Sized>(
    items: Vec<SearchItem>,
    options: &SearchOptions,
    rng: &mut R,
) -> Vec<SearchItem> {
    let mut filtered: Vec<SearchItem> = items
        .into_iter()
        .filter(|item| is_public_platform_url(&item.url))
        .collect();

    filtered.retain(|item| options.platform.matches(item.platform));

    if options.ai_mode {
        filtered.sort_by(|a, b| b.ai_score.total_cmp(&a.ai_score));
        filtered.truncate(CURATED_RESULT_COUNT);
        // Intentional: expose the best matches but not always in the same
        // order, so the top result varies across identical searches.
        filtered.shuffle(rng);
    } else {
        match options.sort_by {
            SortBy::Newest => {
                filtered.sort_by_key(|item| {
                    std::cmp::Reverse(published_timestamp_ms(&item.published_at))
                });
            }
            SortBy::Popularity => {
                filtered.sort_by(|a, b| b.view_count.cmp(&a.view_count));
            }
            SortBy::PublicDomain => {
                filtered.retain(|item| item.platform == Platform::Jamendo);
            }
            SortBy::Relevance => {
                filtered.sort_by(|a, b| b.ai_score.total_cmp(&a.ai_score));
            }
        }
    }

    filtered
}

/// Validity filter: the URL must carry a known platform domain marker and
/// must not look like an authentication wall.
pub fn is_public_platform_url(url: &str) -> bool {
    let url = url.to_lowercase();

    let on_known_platform = Platform::ALL
        .iter()
        .flat_map(|platform| platform.domain_markers())
        .any(|marker| url.contains(marker));

    on_known_platform && !url.contains("login") && !url.contains("signin")
}

/// Parse a `publishedAt` string into epoch milliseconds.
///
/// Providers disagree wildly on date formats; anything unparseable sorts as
/// epoch zero.
fn published_timestamp_ms(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return naive.and_utc().timestamp_millis();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map_or(0, |naive| naive.and_utc().timestamp_millis());
    }
    // Bare year, common on Internet Archive records.
    if let Ok(year) = raw.parse::<i32>() {
        if (1000..=9999).contains(&year) {
            return NaiveDate::from_ymd_opt(year, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(0, |naive| naive.and_utc().timestamp_millis());
        }
    }

    0
}
