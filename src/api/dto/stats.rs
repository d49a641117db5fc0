//! DTOs for the stats endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Visit statistics for one short code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub code: String,
    pub original_url: String,
    pub short_url: String,
    /// Number of times the short URL has been resolved.
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}
