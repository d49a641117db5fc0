//! Handler for the shorten endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/long/path", "customCode": "my-link" }
/// ```
///
/// `customCode` is optional; without it a random 6-character code is generated.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "my-link",
///   "originalUrl": "https://example.com/long/path",
///   "shortUrl": "http://localhost:3000/r/my-link"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the URL or custom code is malformed
/// - 409 Conflict if the custom code is already in use
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let mapping = state
        .mapping_service
        .create_short_mapping(payload.url, payload.custom_code)
        .await?;

    let short_url = state.mapping_service.short_url(&mapping.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: mapping.code,
            original_url: mapping.target,
            short_url,
        }),
    ))
}
