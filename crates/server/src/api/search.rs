//! Search API handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use melodine_core::{process, PlatformFilter, SearchItem, SearchOptions, SortBy};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, rename = "aiMode")]
    pub ai_mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /api/search
///
/// Fan the query out to every registered provider, then filter and rank the
/// merged results. Provider failures never fail the request; with every
/// provider down the response is an empty array.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchItem>>, (StatusCode, Json<ErrorResponse>)> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing search query".to_string(),
            }),
        ));
    }

    let options = SearchOptions {
        ai_mode: params.ai_mode.as_deref() == Some("true"),
        sort_by: params
            .sort_by
            .as_deref()
            .map(SortBy::parse)
            .unwrap_or_default(),
        platform: params
            .platform
            .as_deref()
            .map(PlatformFilter::parse)
            .unwrap_or_default(),
    };

    let aggregated = state.aggregator().search(query).await;

    info!(
        query = query,
        results = aggregated.items.len(),
        failed_providers = aggregated.provider_errors.len(),
        duration_ms = aggregated.duration_ms,
        "Search complete"
    );

    let items = process(aggregated.items, &options);
    Ok(Json(items))
}
