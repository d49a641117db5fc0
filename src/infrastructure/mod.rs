//! Infrastructure layer for external integrations.
//!
//! Implements the storage contract defined by the domain layer and the
//! redirect cache.
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`persistence`] - Mapping store implementations

pub mod cache;
pub mod persistence;
