//! User service
//!
//! Registers and looks up users. Users live in the in-memory store for the
//! lifetime of the process.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod service;
pub mod setup;
pub mod state;

pub use catalog::UserErrorCatalog;
pub use error::UserError;
pub use service::UserService;
pub use state::AppState;

pub const SERVICE_NAME: &str = "user-service";
