//! Domain layer containing business entities and storage contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit tracking event model
//! - [`visit_worker`] - Asynchronous visit counting worker
//!
//! # Visit Processing Flow
//!
//! 1. A redirect resolves a code to its target
//! 2. A [`visit_event::VisitEvent`] is sent to a bounded channel (never blocking the redirect)
//! 3. [`visit_worker::run_visit_worker`] applies atomic increments via
//!    [`repositories::MappingRepository::increment_visits`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
