//! Data Transfer Objects for API requests and responses.
//!
//! DTOs use Serde for JSON (camelCase field names on the wire) and validator
//! for input validation.

pub mod health;
pub mod shorten;
pub mod stats;
