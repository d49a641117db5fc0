//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers
//! and the admin CLI.
//!
//! - [`services::code_allocator::CodeAllocator`] - Picks custom or generated short codes
//! - [`services::mapping_service::MappingService`] - Create, resolve and stats operations

pub mod services;
