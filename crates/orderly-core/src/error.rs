//! Error classification module
//!
//! Domain errors stay owned by the business layer. The HTTP layer never inspects
//! them directly: it asks an [`ErrorCatalog`] for a stable [`ErrorRecord`] and for
//! the validation/database classification, and derives status codes and log
//! severities from those answers alone.
//!
//! A service registers a new domain error by adding an arm to its catalog's
//! [`ErrorCatalog::lookup`]. Everything the catalog does not recognise falls back
//! to the generic internal-error record.

use serde::{Deserialize, Serialize};

/// Code emitted for errors the catalog does not recognise.
pub const SYSTEM_INTERNAL_ERROR: &str = "SYSTEM_INTERNAL_ERROR";

/// Code emitted by the validation shortcut of the HTTP error handler.
pub const VALIDATION_INVALID_REQUEST: &str = "VALIDATION_INVALID_REQUEST";

const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";
const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";
const INVALID_REQUEST_MESSAGE: &str = "Invalid request format";

/// Log severity for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Expected outcomes such as lookups that found nothing
    Info,
    /// Client mistakes like validation failures
    Warn,
    /// Unexpected failures on the server side
    Error,
}

/// Stable, client-facing description of a failure.
///
/// Serialized verbatim both to the response body and to structured logs:
/// `{"error_code": "...", "error_message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "error_code")]
    pub code: String,
    #[serde(rename = "error_message")]
    pub message: String,
}

impl ErrorRecord {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Generic record for errors the catalog does not know about
    pub fn unexpected() -> Self {
        Self::new(SYSTEM_INTERNAL_ERROR, UNEXPECTED_ERROR_MESSAGE)
    }

    /// Generic record for internal failures whose detail must stay server-side
    pub fn internal() -> Self {
        Self::new(SYSTEM_INTERNAL_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Validation record carrying a caller-supplied message.
    ///
    /// A blank message is replaced with a generic one.
    pub fn validation(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            INVALID_REQUEST_MESSAGE
        } else {
            message
        };
        Self::new(VALIDATION_INVALID_REQUEST, message)
    }

    /// Replace a record with an empty code or message by the generic one.
    pub fn or_fallback(self) -> Self {
        if self.code.trim().is_empty() || self.message.trim().is_empty() {
            Self::unexpected()
        } else {
            self
        }
    }
}

/// Coarse classification a catalog attaches to each known error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Client-supplied input violates a business rule
    Validation,
    /// The persistence layer failed
    Database,
    /// Anything else (not found, conflicts, timeouts, ...)
    Other,
}

/// One registered mapping from a domain error to its record and class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub message: &'static str,
    pub class: ErrorClass,
}

impl CatalogEntry {
    pub const fn validation(code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            message,
            class: ErrorClass::Validation,
        }
    }

    pub const fn database(code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            message,
            class: ErrorClass::Database,
        }
    }

    pub const fn other(code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            message,
            class: ErrorClass::Other,
        }
    }

    pub fn record(&self) -> ErrorRecord {
        ErrorRecord::new(self.code, self.message)
    }
}

/// Capability contract mapping a service's domain errors to API errors.
///
/// Implementations must be deterministic and side-effect free: the same error
/// value always yields the same record for the lifetime of the process.
///
/// Only [`lookup`](ErrorCatalog::lookup) is required. The provided methods make
/// [`classify`](ErrorCatalog::classify) total: unknown errors map to
/// [`ErrorRecord::unexpected`].
///
/// # Examples
/// ```
/// use orderly_core::{CatalogEntry, ErrorCatalog};
///
/// #[derive(Debug, thiserror::Error)]
/// enum ParcelError {
///     #[error("parcel not found")]
///     NotFound,
///     #[error("something else")]
///     Other,
/// }
///
/// struct ParcelCatalog;
///
/// impl ErrorCatalog for ParcelCatalog {
///     type Error = ParcelError;
///
///     fn lookup(&self, err: &ParcelError) -> Option<CatalogEntry> {
///         match err {
///             ParcelError::NotFound => Some(CatalogEntry::other("PARCEL_NOT_FOUND", "Parcel not found")),
///             ParcelError::Other => None,
///         }
///     }
/// }
///
/// assert_eq!(ParcelCatalog.classify(&ParcelError::NotFound).code, "PARCEL_NOT_FOUND");
/// assert_eq!(ParcelCatalog.classify(&ParcelError::Other).code, "SYSTEM_INTERNAL_ERROR");
/// ```
pub trait ErrorCatalog: Send + Sync + 'static {
    /// Domain error type this catalog classifies
    type Error: std::error::Error + Send + Sync + 'static;

    /// Registered entry for `err`, or `None` when the error is unknown.
    fn lookup(&self, err: &Self::Error) -> Option<CatalogEntry>;

    /// Client-facing record for `err`. Never empty.
    fn classify(&self, err: &Self::Error) -> ErrorRecord {
        self.lookup(err)
            .map(|entry| entry.record())
            .unwrap_or_else(ErrorRecord::unexpected)
            .or_fallback()
    }

    fn is_validation_error(&self, err: &Self::Error) -> bool {
        matches!(self.lookup(err), Some(entry) if entry.class == ErrorClass::Validation)
    }

    fn is_database_error(&self, err: &Self::Error) -> bool {
        matches!(self.lookup(err), Some(entry) if entry.class == ErrorClass::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, thiserror::Error)]
    enum SampleError {
        #[error("missing name")]
        MissingName,
        #[error("pool closed")]
        PoolClosed,
        #[error("sample not found")]
        NotFound,
        #[error("blank entry")]
        Blank,
        #[error("{0}")]
        Unknown(String),
    }

    struct SampleCatalog;

    impl ErrorCatalog for SampleCatalog {
        type Error = SampleError;

        fn lookup(&self, err: &SampleError) -> Option<CatalogEntry> {
            match err {
                SampleError::MissingName => Some(CatalogEntry::validation(
                    "VALIDATION_MISSING_NAME",
                    "Name is required",
                )),
                SampleError::PoolClosed => Some(CatalogEntry::database(
                    "DATABASE_CONNECTION_ERROR",
                    "Database connection failed",
                )),
                SampleError::NotFound => Some(CatalogEntry::other(
                    "SAMPLE_NOT_FOUND",
                    "The requested sample could not be found",
                )),
                SampleError::Blank => Some(CatalogEntry::other("", "")),
                SampleError::Unknown(_) => None,
            }
        }
    }

    #[test]
    fn test_classify_known_errors() {
        let record = SampleCatalog.classify(&SampleError::MissingName);
        assert_eq!(record.code, "VALIDATION_MISSING_NAME");
        assert_eq!(record.message, "Name is required");
        assert!(SampleCatalog.is_validation_error(&SampleError::MissingName));
        assert!(!SampleCatalog.is_database_error(&SampleError::MissingName));

        assert!(SampleCatalog.is_database_error(&SampleError::PoolClosed));
        assert!(!SampleCatalog.is_validation_error(&SampleError::PoolClosed));

        let record = SampleCatalog.classify(&SampleError::NotFound);
        assert_eq!(record.code, "SAMPLE_NOT_FOUND");
        assert!(!SampleCatalog.is_validation_error(&SampleError::NotFound));
        assert!(!SampleCatalog.is_database_error(&SampleError::NotFound));
    }

    #[test]
    fn test_empty_entry_falls_back_to_generic_record() {
        assert_eq!(
            SampleCatalog.classify(&SampleError::Blank),
            ErrorRecord::unexpected()
        );
    }

    #[test]
    fn test_validation_record_defaults_blank_message() {
        let record = ErrorRecord::validation("   ");
        assert_eq!(record.code, VALIDATION_INVALID_REQUEST);
        assert_eq!(record.message, "Invalid request format");

        let record = ErrorRecord::validation("name is too long");
        assert_eq!(record.message, "name is too long");
    }

    #[test]
    fn test_record_serializes_with_api_field_names() {
        let json = serde_json::to_value(ErrorRecord::internal()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error_code": "SYSTEM_INTERNAL_ERROR",
                "error_message": "An internal error occurred",
            })
        );
    }

    proptest! {
        #[test]
        fn prop_unknown_errors_get_generic_record(text in ".*") {
            let err = SampleError::Unknown(text);
            let first = SampleCatalog.classify(&err);
            prop_assert_eq!(&first, &ErrorRecord::unexpected());
            prop_assert!(!first.code.is_empty());
            prop_assert!(!first.message.is_empty());
            prop_assert_eq!(first, SampleCatalog.classify(&err));
            prop_assert!(!SampleCatalog.is_validation_error(&err));
            prop_assert!(!SampleCatalog.is_database_error(&err));
        }
    }
}
