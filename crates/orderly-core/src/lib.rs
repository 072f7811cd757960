//! Orderly Core Library
//!
//! This crate provides the domain models, the error classification contract, and
//! the configuration types shared by every Orderly service.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ConfigError, DatabaseConfig, LogConfig, StorageConfig, StorageKind};
pub use error::{CatalogEntry, ErrorCatalog, ErrorClass, ErrorRecord, Severity};
pub use models::{Order, OrderItem, OrderStatus, User, UserValidationError};
