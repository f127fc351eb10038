//! Relevance scoring.
//!
//! Pure functions, no I/O. Every adapter uses the same additive rule
//! structure; which inputs it feeds in (title-only vs. title+artist, with or
//! without the popularity bonus) is a per-adapter choice. The point values
//! are part of the contract: callers sort and truncate on them.

/// Score a result against the query using title and artist.
///
/// Matching is case-insensitive substring/equality/word-membership. Words are
/// split on single spaces, no stemming or fuzzy matching.
pub fn relevance_score(title: &str, artist: &str, query: &str) -> f64 {
    let query = query.to_lowercase();
    let title = title.to_lowercase();
    let artist = artist.to_lowercase();

    let mut score = 0.0;
    if title.contains(&query) {
        score += 50.0;
    }
    if artist.contains(&query) {
        score += 30.0;
    }
    if title == query {
        score += 100.0;
    }
    if artist == query {
        score += 80.0;
    }

    score + word_match_bonus(&title, &query)
}

/// Title-only variant, for providers whose primary identity is a channel or
/// station name rather than a track.
pub fn title_relevance_score(title: &str, query: &str) -> f64 {
    let query = query.to_lowercase();
    let title = title.to_lowercase();

    let mut score = 0.0;
    if title.contains(&query) {
        score += 50.0;
    }
    if title == query {
        score += 100.0;
    }

    score + word_match_bonus(&title, &query)
}

/// Normalized popularity base: one point per thousand plays, capped at 20.
pub fn popularity_bonus(play_count: u64) -> f64 {
    (play_count as f64 / 1000.0).min(20.0)
}

/// 10 points per query word that literally appears among the title's words.
fn word_match_bonus(title_lower: &str, query_lower: &str) -> f64 {
    let title_words: Vec<&str> = title_lower.split(' ').collect();
    let matching = query_lower
        .split(' ')
        .filter(|word| title_words.contains(word))
        .count();
    matching as f64 * 10.0
}
