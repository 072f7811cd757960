//! Order service
//!
//! Creates and fetches orders over HTTP on top of the shared Orderly
//! infrastructure.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod usecase;

pub use catalog::OrderErrorCatalog;
pub use error::OrderError;
pub use state::AppState;

/// Service name used for logging defaults
pub const SERVICE_NAME: &str = "order-service";
