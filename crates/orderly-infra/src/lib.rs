//! Orderly Infrastructure Library
//!
//! Shared HTTP infrastructure used by every Orderly service:
//! - Error translation (`HttpErrorHandler`)
//! - Request pipeline middleware (request ID, request logging, panic recovery)
//! - Logger initialization
//! - Server startup with graceful shutdown

/// Emit a tracing event at a runtime-selected severity.
macro_rules! log_at {
    ($severity:expr, $($arg:tt)+) => {
        match $severity {
            orderly_core::Severity::Info => tracing::info!($($arg)+),
            orderly_core::Severity::Warn => tracing::warn!($($arg)+),
            orderly_core::Severity::Error => tracing::error!($($arg)+),
        }
    };
}

pub mod error_handler;
pub mod middleware;
pub mod server;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export commonly used types
pub use error_handler::{status_for_code, HttpErrorHandler, RequestMeta};
pub use middleware::{
    get_request_id, panic_recovery_middleware, request_id_middleware,
    request_logging_middleware, with_observability, RequestId, RequestLogging,
    REQUEST_ID_HEADER,
};
pub use server::start_server;
pub use telemetry::{init_logging, shutdown_logging, LogGuard, TelemetryError};
