//! Repository contract
//!
//! Use cases persist entities through [`Repository`] without knowing which backend
//! the factory bound for this process.

use async_trait::async_trait;
use orderly_core::{Order, User};
use thiserror::Error;

/// Repository operation errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No entity is stored under the requested identifier
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Unsupported storage type: {0}")]
    UnsupportedStorage(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }

    /// Whether the failure came from reaching the backend rather than from a statement
    pub fn is_connection_error(&self) -> bool {
        match self {
            RepositoryError::Connection(_) => true,
            RepositoryError::Query(err) => matches!(
                err,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Anything a repository can store: owned data keyed by a string identifier
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Entity for Order {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Persistence contract shared by every backend.
///
/// `save` is last-write-wins. `find_by_id` returns [`RepositoryError::NotFound`]
/// when nothing is stored under `id`.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn save(&self, entity: &T) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<T>;
}
