//! Handler for per-code statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the original URL and visit count for a short code.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "code": "abc123",
///   "originalUrl": "https://example.com/long/path",
///   "shortUrl": "http://localhost:3000/r/abc123",
///   "clicks": 15,
///   "createdAt": "2025-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.mapping_service.get_stats(&code).await?;
    let short_url = state.mapping_service.short_url(&code);

    Ok(Json(StatsResponse {
        code,
        original_url: stats.target,
        short_url,
        clicks: stats.visit_count,
        created_at: stats.created_at,
    }))
}
