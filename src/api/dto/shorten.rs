//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::code_generator::{CUSTOM_CODE_REGEX, MAX_CUSTOM_CODE_LENGTH};

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten.
    #[validate(url(message = "Please provide a valid URL"))]
    pub url: String,

    /// Optional caller-chosen short code.
    #[validate(length(min = 1, max = MAX_CUSTOM_CODE_LENGTH))]
    #[validate(regex(
        path = *CUSTOM_CODE_REGEX,
        message = "Custom code can only contain letters, numbers, hyphens, and underscores"
    ))]
    pub custom_code: Option<String>,
}

/// Created mapping.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub code: String,
    pub original_url: String,
    pub short_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, custom_code: Option<&str>) -> ShortenRequest {
        ShortenRequest {
            url: url.to_string(),
            custom_code: custom_code.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("https://example.com", None).validate().is_ok());
        assert!(request("https://example.com", Some("my-link_1")).validate().is_ok());
    }

    #[test]
    fn test_invalid_url() {
        assert!(request("not a url", None).validate().is_err());
    }

    #[test]
    fn test_invalid_custom_code() {
        assert!(request("https://example.com", Some("bad code")).validate().is_err());
        assert!(request("https://example.com", Some("")).validate().is_err());
    }

    #[test]
    fn test_custom_code_length_limit() {
        let longest = "a".repeat(MAX_CUSTOM_CODE_LENGTH as usize);
        assert!(request("https://example.com", Some(&longest)).validate().is_ok());

        let too_long = "a".repeat(MAX_CUSTOM_CODE_LENGTH as usize + 1);
        assert!(request("https://example.com", Some(&too_long)).validate().is_err());
    }

    #[test]
    fn test_deserializes_camel_case() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"url":"https://a.com","customCode":"abc"}"#).unwrap();
        assert_eq!(req.custom_code.as_deref(), Some("abc"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ShortenResponse {
            code: "abc123".to_string(),
            original_url: "https://a.com".to_string(),
            short_url: "http://localhost:3000/r/abc123".to_string(),
        })
        .unwrap();

        assert_eq!(json["originalUrl"], "https://a.com");
        assert_eq!(json["shortUrl"], "http://localhost:3000/r/abc123");
    }
}
