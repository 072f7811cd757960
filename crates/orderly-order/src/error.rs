use orderly_db::RepositoryError;
use thiserror::Error;

/// Order domain errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order not found")]
    NotFound,

    #[error("invalid order ID")]
    InvalidId,

    #[error("user ID is required")]
    MissingUserId,

    #[error("order must contain at least one item")]
    EmptyItems,

    #[error("item quantity must be greater than zero")]
    InvalidQuantity,

    #[error("item price must be greater than zero")]
    InvalidPrice,

    #[error("product ID is required for all items")]
    MissingProductId,

    #[error("database connection failed")]
    DatabaseConnection(#[source] RepositoryError),

    #[error("database query failed")]
    DatabaseQuery(#[source] RepositoryError),

    #[error("request timeout")]
    Timeout,
}

impl From<RepositoryError> for OrderError {
    fn from(err: RepositoryError) -> Self {
        if err.is_connection_error() {
            OrderError::DatabaseConnection(err)
        } else {
            OrderError::DatabaseQuery(err)
        }
    }
}
