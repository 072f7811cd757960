//! Logger initialization
//!
//! This module installs the global tracing subscriber from [`LogConfig`].
//!
//! [`LogConfig`]: orderly_core::LogConfig

mod init;
mod rolling;

pub use init::{init_logging, shutdown_logging, LogGuard, TelemetryError};
