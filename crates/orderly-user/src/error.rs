use orderly_core::UserValidationError;
use orderly_db::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("user with this email already exists")]
    AlreadyExists,

    #[error("user ID is required")]
    MissingId,

    #[error(transparent)]
    Invalid(#[from] UserValidationError),

    #[error("database query failed")]
    Database(#[from] RepositoryError),

    #[error("request timeout")]
    Timeout,
}
