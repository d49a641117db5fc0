//! Mapping entity representing a short code and its target URL.

use chrono::{DateTime, Utc};

/// A persisted short code → target URL mapping with its visit counter.
///
/// `code` and `target` never change after creation; `visit_count` only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub code: String,
    pub target: String,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(code: String, target: String, visit_count: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            target,
            visit_count,
            created_at,
        }
    }
}

/// Input data for creating a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub target: String,
}

impl NewMapping {
    pub fn new(code: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
        }
    }
}

/// Read-only projection returned by the stats operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingStats {
    pub target: String,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Mapping> for MappingStats {
    fn from(mapping: Mapping) -> Self {
        Self {
            target: mapping.target,
            visit_count: mapping.visit_count,
            created_at: mapping.created_at,
        }
    }
}
