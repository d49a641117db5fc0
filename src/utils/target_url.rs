//! Target URL checks applied before a mapping is stored.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Validates a target URL so it can be stored and later redirected to as-is.
///
/// # Rules
///
/// 1. **Characters**: no control characters. `Url::parse` silently strips tabs
///    and newlines, but the raw string would not survive as a `Location` header.
/// 2. **Format**: must parse as an absolute URL.
///
/// The target is never rewritten, so resolving returns exactly what was given.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_target_url(target: &str) -> Result<(), AppError> {
    if let Some(position) = target.find(char::is_control) {
        return Err(AppError::bad_request(
            "URL must not contain control characters",
            json!({ "position": position }),
        ));
    }

    Url::parse(target).map_err(|e| {
        AppError::bad_request("Please provide a valid URL", json!({ "reason": e.to_string() }))
    })?;

    Ok(())
}
