//! Core domain entities.
//!
//! The service has a single persisted entity, [`Mapping`]: a flat key → record
//! table keyed by short code. [`NewMapping`] is the insert payload and
//! [`MappingStats`] the projection served by the stats endpoint.

pub mod mapping;

pub use mapping::{Mapping, MappingStats, NewMapping};
