//! Short code allocation.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

/// Maximum random draws per allocation before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Decides which code a new mapping gets.
///
/// Only performs read-only existence checks; it never writes. A code returned
/// by [`CodeAllocator::allocate`] is free *at the time of the check* and is not
/// reserved, so the store's insert remains the source of truth.
pub struct CodeAllocator<R: MappingRepository + ?Sized, G: CodeGenerator = RandomCodeGenerator> {
    repository: Arc<R>,
    generator: G,
}

impl<R: MappingRepository + ?Sized> CodeAllocator<R> {
    /// Creates an allocator drawing uniform random alphanumeric codes.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_generator(repository, RandomCodeGenerator)
    }
}

impl<R: MappingRepository + ?Sized, G: CodeGenerator> CodeAllocator<R, G> {
    /// Creates an allocator with a custom code source.
    pub fn with_generator(repository: Arc<R>, generator: G) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Picks the code for a new mapping.
    ///
    /// - `Some(code)`: returned verbatim if no mapping uses it yet.
    /// - `None`: a freshly generated code with no existing mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the requested code is taken.
    /// Returns [`AppError::AllocationExhausted`] if every generated candidate collided.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn allocate(&self, requested: Option<&str>) -> Result<String, AppError> {
        match requested {
            Some(code) => {
                if self.repository.exists(code).await? {
                    return Err(AppError::conflict(
                        "Custom code is already in use",
                        json!({ "code": code }),
                    ));
                }
                Ok(code.to_string())
            }
            None => self.generate_unique_code().await,
        }
    }

    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.generator.generate();

            if !self.repository.exists(&code).await? {
                return Ok(code);
            }

            debug!(%code, attempt, "Generated code already taken");
        }

        Err(AppError::allocation_exhausted(
            "Failed to generate unique code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }
}
