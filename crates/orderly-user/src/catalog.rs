use orderly_core::{CatalogEntry, ErrorCatalog, UserValidationError};

use crate::error::UserError;

pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const USER_ALREADY_EXISTS: &str = "USER_ALREADY_EXISTS";
pub const VALIDATION_MISSING_USER_ID: &str = "VALIDATION_MISSING_USER_ID";
pub const VALIDATION_NAME_REQUIRED: &str = "VALIDATION_NAME_REQUIRED";
pub const VALIDATION_EMAIL_REQUIRED: &str = "VALIDATION_EMAIL_REQUIRED";
pub const VALIDATION_INVALID_EMAIL: &str = "VALIDATION_INVALID_EMAIL";
pub const DATABASE_QUERY_ERROR: &str = "DATABASE_QUERY_ERROR";
pub const SYSTEM_TIMEOUT: &str = "SYSTEM_TIMEOUT";

/// Error catalog for the user service
#[derive(Debug, Clone, Copy, Default)]
pub struct UserErrorCatalog;

impl ErrorCatalog for UserErrorCatalog {
    type Error = UserError;

    fn lookup(&self, err: &UserError) -> Option<CatalogEntry> {
        let entry = match err {
            UserError::NotFound => {
                CatalogEntry::other(USER_NOT_FOUND, "The requested user could not be found")
            }
            UserError::AlreadyExists => {
                CatalogEntry::other(USER_ALREADY_EXISTS, "User with this email already exists")
            }
            UserError::MissingId => {
                CatalogEntry::validation(VALIDATION_MISSING_USER_ID, "User ID is required")
            }
            UserError::Invalid(UserValidationError::NameRequired) => {
                CatalogEntry::validation(VALIDATION_NAME_REQUIRED, "Name is required")
            }
            UserError::Invalid(UserValidationError::EmailRequired) => {
                CatalogEntry::validation(VALIDATION_EMAIL_REQUIRED, "Email is required")
            }
            UserError::Invalid(UserValidationError::InvalidEmail) => {
                CatalogEntry::validation(VALIDATION_INVALID_EMAIL, "Invalid email format")
            }
            UserError::Database(_) => {
                CatalogEntry::database(DATABASE_QUERY_ERROR, "Database query failed")
            }
            UserError::Timeout => CatalogEntry::other(SYSTEM_TIMEOUT, "Request timeout"),
        };
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_keep_their_own_codes() {
        let catalog = UserErrorCatalog;
        let err = UserError::from(UserValidationError::InvalidEmail);

        assert!(catalog.is_validation_error(&err));
        assert_eq!(catalog.classify(&err).code, VALIDATION_INVALID_EMAIL);
        assert!(!catalog.is_validation_error(&UserError::AlreadyExists));
    }
}
