//! Order error catalog
//!
//! Every [`OrderError`] variant is registered here with its stable API code.
//! Malformed request bodies never reach the catalog; the handler reports them
//! through the shared `VALIDATION_INVALID_REQUEST` record.

use orderly_core::{CatalogEntry, ErrorCatalog};

use crate::error::OrderError;

pub const ORDER_NOT_FOUND: &str = "ORDER_NOT_FOUND";
pub const ORDER_INVALID_ID: &str = "ORDER_INVALID_ID";

pub const VALIDATION_MISSING_USER_ID: &str = "VALIDATION_MISSING_USER_ID";
pub const VALIDATION_EMPTY_ITEMS: &str = "VALIDATION_EMPTY_ITEMS";
pub const VALIDATION_INVALID_QUANTITY: &str = "VALIDATION_INVALID_QUANTITY";
pub const VALIDATION_INVALID_PRICE: &str = "VALIDATION_INVALID_PRICE";
pub const VALIDATION_MISSING_PRODUCT_ID: &str = "VALIDATION_MISSING_PRODUCT_ID";

pub const DATABASE_CONNECTION_ERROR: &str = "DATABASE_CONNECTION_ERROR";
pub const DATABASE_QUERY_ERROR: &str = "DATABASE_QUERY_ERROR";

pub const SYSTEM_TIMEOUT: &str = "SYSTEM_TIMEOUT";

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderErrorCatalog;

impl ErrorCatalog for OrderErrorCatalog {
    type Error = OrderError;

    fn lookup(&self, err: &OrderError) -> Option<CatalogEntry> {
        let entry = match err {
            OrderError::NotFound => {
                CatalogEntry::other(ORDER_NOT_FOUND, "The requested order could not be found")
            }
            OrderError::InvalidId => CatalogEntry::other(ORDER_INVALID_ID, "Invalid order ID format"),

            OrderError::MissingUserId => {
                CatalogEntry::validation(VALIDATION_MISSING_USER_ID, "User ID is required")
            }
            OrderError::EmptyItems => CatalogEntry::validation(
                VALIDATION_EMPTY_ITEMS,
                "Order must contain at least one item",
            ),
            OrderError::InvalidQuantity => CatalogEntry::validation(
                VALIDATION_INVALID_QUANTITY,
                "Item quantity must be greater than zero",
            ),
            OrderError::InvalidPrice => CatalogEntry::validation(
                VALIDATION_INVALID_PRICE,
                "Item price must be greater than zero",
            ),
            OrderError::MissingProductId => CatalogEntry::validation(
                VALIDATION_MISSING_PRODUCT_ID,
                "Product ID is required for all items",
            ),

            OrderError::DatabaseConnection(_) => {
                CatalogEntry::database(DATABASE_CONNECTION_ERROR, "Database connection failed")
            }
            OrderError::DatabaseQuery(_) => {
                CatalogEntry::database(DATABASE_QUERY_ERROR, "Database query failed")
            }

            OrderError::Timeout => CatalogEntry::other(SYSTEM_TIMEOUT, "Request timeout"),
        };
        Some(entry)
    }
}
