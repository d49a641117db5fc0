//! Short code generation and validation utilities.
//!
//! Generated codes are drawn uniformly per character from a 62-character
//! alphanumeric alphabet. Custom codes supplied by callers may additionally
//! contain hyphens and underscores.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Characters used for generated codes.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Maximum length accepted for custom codes.
pub const MAX_CUSTOM_CODE_LENGTH: u64 = 64;

// 62^6 ≈ 5.6e10. Random draws stay collision-free in practice only while the
// code space dwarfs the number of stored mappings.
const _: () = assert!((ALPHABET.len() as u64).pow(GENERATED_CODE_LENGTH as u32) >= 1 << 35);

/// Pattern custom codes must match.
pub static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid custom code regex"));

/// Source of candidate short codes.
///
/// Implementations are pure generators; uniqueness is checked by the caller
/// against the store.
pub trait CodeGenerator: Send + Sync {
    /// Produces the next candidate code.
    fn generate(&self) -> String;
}

/// Uniform random generator over [`ALPHABET`].
///
/// Uses the thread-local RNG: fast, not cryptographic. Codes are identifiers,
/// not secrets.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random [`GENERATED_CODE_LENGTH`]-character alphanumeric code.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Validates a caller-supplied custom code.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: letters, digits, hyphens, underscores
///
/// The code is never rewritten: `"AbC"` and `"abc"` are distinct codes.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH as usize {
        return Err(AppError::bad_request(
            format!("Custom code must be 1-{MAX_CUSTOM_CODE_LENGTH} characters"),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, numbers, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
