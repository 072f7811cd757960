//! User registration and lookup

use std::sync::Arc;

use orderly_core::User;
use orderly_db::{MemoryStore, Repository};
use uuid::Uuid;

use crate::error::UserError;

#[derive(Clone)]
pub struct UserService {
    store: Arc<MemoryStore<User>>,
}

impl UserService {
    pub fn new(store: Arc<MemoryStore<User>>) -> Self {
        Self { store }
    }

    /// Validate, reject a duplicate email, then persist under a fresh id.
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User, UserError> {
        let mut user = match User::new(name, email) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Create user failed: validation");
                return Err(e.into());
            }
        };

        user.id = Uuid::new_v4().to_string();
        let saved = self
            .store
            .save_if_absent(&user, |existing| existing.email == user.email)
            .await;
        if !saved {
            tracing::warn!(email = %user.email, "Create user failed: email already registered");
            return Err(UserError::AlreadyExists);
        }

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, UserError> {
        if id.trim().is_empty() {
            return Err(UserError::MissingId);
        }

        self.store.find_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                UserError::NotFound
            } else {
                UserError::Database(e)
            }
        })
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.store.get_all().await
    }
}
