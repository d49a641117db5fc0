//! In-process implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreError};

/// Mapping store held in a sharded concurrent map.
///
/// Inserts go through the entry API, so the check for an existing code and the
/// write happen under the same shard lock. Increments mutate the record in
/// place under that lock as well. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryMappingRepository {
    mappings: DashMap<String, Mapping>,
}

impl MemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingRepository for MemoryMappingRepository {
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        match self.mappings.entry(new_mapping.code) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateCode(entry.key().clone())),
            Entry::Vacant(entry) => {
                let mapping = Mapping::new(entry.key().clone(), new_mapping.target, 0, Utc::now());
                entry.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        Ok(self.mappings.get(code).map(|m| m.value().clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.mappings.contains_key(code))
    }

    async fn increment_visits(&self, code: &str) -> Result<(), StoreError> {
        match self.mappings.get_mut(code) {
            Some(mut mapping) => {
                mapping.visit_count += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound(code.to_string())),
        }
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.mappings.len() as i64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
