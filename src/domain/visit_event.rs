//! Visit event model for asynchronous visit counting.

use chrono::{DateTime, Utc};

/// A single resolved redirect waiting to be counted.
///
/// Sent from [`crate::application::services::MappingService::resolve_and_count`]
/// to [`crate::domain::visit_worker::run_visit_worker`] over a bounded channel,
/// which decouples the redirect response from the counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    pub code: String,
    pub resolved_at: DateTime<Utc>,
}

impl VisitEvent {
    /// Creates a visit event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            resolved_at: Utc::now(),
        }
    }
}
