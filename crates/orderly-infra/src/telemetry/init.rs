use std::path::Path;

use orderly_core::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use super::rolling::{RollingFile, RollingPolicy};

const DEFAULT_LEVEL: &str = "info";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("failed to open log file {path}: {reason}")]
    LogFile { path: String, reason: String },
}

/// Keeps the non-blocking log writers alive. Dropping it flushes them.
#[must_use = "dropping the guard stops background log writers"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    /// Unknown formats fall back to JSON
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "text" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Console,
    File,
    Both,
}

impl LogOutput {
    /// Unknown outputs fall back to the console
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Console,
        }
    }
}

/// Filter directive for the configured level, and whether it had to fall back
fn resolve_level(level: &str) -> (String, bool) {
    let normalized = match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "fatal" | "panic" => "error".to_string(),
        other => other.to_string(),
    };

    match normalized.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => (normalized, false),
        _ => (DEFAULT_LEVEL.to_string(), true),
    }
}

fn fmt_layer<W>(format: LogFormat, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}

fn file_layer(
    config: &LogConfig,
    format: LogFormat,
    guards: &mut Vec<WorkerGuard>,
) -> Result<BoxedLayer, TelemetryError> {
    let file = RollingFile::open(Path::new(&config.file_path), RollingPolicy::from_config(config))
        .map_err(|e| TelemetryError::LogFile {
            path: config.file_path.clone(),
            reason: e.to_string(),
        })?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    guards.push(guard);
    Ok(fmt_layer(format, writer))
}

fn console_layer(format: LogFormat, guards: &mut Vec<WorkerGuard>) -> BoxedLayer {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(guard);
    fmt_layer(format, writer)
}

/// Install the global subscriber.
///
/// File output rolls by size with the configured backup count, age and
/// compression. `RUST_LOG` overrides the configured level. If the log file
/// cannot be opened the logger falls back to stdout and reports the problem
/// once it is running.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, TelemetryError> {
    let format = LogFormat::parse(&config.format);
    let output = LogOutput::parse(&config.output);
    let (level, level_fell_back) = resolve_level(&config.level);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_error = None;

    if matches!(output, LogOutput::File | LogOutput::Both) {
        match file_layer(config, format, &mut guards) {
            Ok(layer) => layers.push(layer),
            Err(err) => file_error = Some(err),
        }
    }
    if output != LogOutput::File || file_error.is_some() {
        layers.push(console_layer(format, &mut guards));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    if level_fell_back {
        tracing::warn!(
            configured_level = %config.level,
            "Invalid log level, defaulting to INFO"
        );
    }
    if let Some(err) = file_error {
        tracing::warn!(error = %err, "Falling back to stdout logging");
    }

    tracing::info!(
        service = %config.service_name,
        level = %level,
        format = ?format,
        output = ?output,
        file_path = %config.file_path,
        max_size_mb = config.max_size_mb,
        max_backups = config.max_backups,
        max_age_days = config.max_age_days,
        compress = config.compress,
        "Logger initialized"
    );

    Ok(LogGuard { _guards: guards })
}

/// Flush buffered log lines. Call last, right before the process exits.
pub fn shutdown_logging(guard: LogGuard) {
    tracing::debug!("Flushing log writers");
    drop(guard);
}
