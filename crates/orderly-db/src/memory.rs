//! In-memory repository
//!
//! One readers-writer lock guards the whole table. Writers (`save`,
//! `save_if_absent`, `clear`) take
//! the exclusive mode; every other accessor takes the shared mode and holds it
//! for a single map access plus a clone.
//!
//! Entities are cloned on the way in and on the way out, so callers never hold a
//! reference into the table.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repository::{Entity, Repository, RepositoryError, RepositoryResult};

pub struct MemoryStore<T: Entity> {
    entries: RwLock<HashMap<String, T>>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Remove every stored entity
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Copies of every stored entity, in no particular order
    pub async fn get_all(&self) -> Vec<T> {
        self.entries.read().await.values().cloned().collect()
    }

    /// Insert `entity` unless a stored entity `conflicts` with it.
    ///
    /// The check and the insert share one write guard, so of several callers
    /// racing on conflicting entities exactly one wins. Returns `false` when a
    /// conflict was found and nothing was written.
    pub async fn save_if_absent<F>(&self, entity: &T, conflicts: F) -> bool
    where
        F: Fn(&T) -> bool + Send,
    {
        let mut entries = self.entries.write().await;
        if entries.values().any(|existing| conflicts(existing)) {
            return false;
        }
        entries.insert(entity.id().to_string(), entity.clone());
        true
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryStore<T> {
    async fn save(&self, entity: &T) -> RepositoryResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(entity.id().to_string(), entity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<T> {
        self.entries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}
