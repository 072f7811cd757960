//! Configuration module
//!
//! Process configuration is read once at startup from the environment (plus an
//! optional `.env` file) and is immutable afterwards.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_STORAGE_TYPE: &str = "postgres";
const DEFAULT_SERVER_PORT: u16 = 8080;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const DB_PORT: u16 = 5432;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_CONNECT_TIMEOUT_SECS: u64 = 5;
const LOG_MAX_SIZE_MB: u64 = 100;
const LOG_MAX_BACKUPS: usize = 5;
const LOG_MAX_AGE_DAYS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("unsupported storage type: {0}")]
    UnsupportedStorage(String),
}

/// Persistence backends a repository can be built on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Postgres,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "postgres" => Ok(StorageKind::Postgres),
            _ => Err(ConfigError::UnsupportedStorage(s.to_string())),
        }
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageKind::Memory => write!(f, "memory"),
            StorageKind::Postgres => write!(f, "postgres"),
        }
    }
}

/// Connection parameters for the relational backend
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DB_PORT,
            user: "user".to_string(),
            password: "pass".to_string(),
            name: "godops".to_string(),
            sslmode: "disable".to_string(),
            max_connections: DB_MAX_CONNECTIONS,
            connect_timeout_secs: DB_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Storage selection. The kind stays a raw string until the repository
/// factory parses it, so an unsupported value surfaces there.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
    pub database: DatabaseConfig,
}

impl StorageConfig {
    pub fn kind(&self) -> Result<StorageKind, ConfigError> {
        self.storage_type.parse()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: DEFAULT_STORAGE_TYPE.to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Logger settings. Zero size, backup or age limits mean the logger default.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub file_path: String,
    pub max_size_mb: u64,
    pub max_backups: usize,
    pub max_age_days: u64,
    pub compress: bool,
    pub service_name: String,
}

impl LogConfig {
    pub fn for_service(service_name: &str) -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            output: "console".to_string(),
            file_path: format!("logs/{}.log", service_name),
            max_size_mb: LOG_MAX_SIZE_MB,
            max_backups: LOG_MAX_BACKUPS,
            max_age_days: LOG_MAX_AGE_DAYS,
            compress: true,
            service_name: service_name.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageConfig,
    pub server_port: u16,
    pub request_timeout_secs: u64,
    pub log: LogConfig,
    pub app_env: String,
}

impl Config {
    /// Load configuration for `service_name` from the process environment.
    pub fn from_env(service_name: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(service_name, |key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "SERVER_PORT",
                    value: raw.clone(),
                })?,
            None => DEFAULT_SERVER_PORT,
        };

        let database = DatabaseConfig {
            host: get("DB_HOST", "localhost"),
            port: lenient(lookup("DB_PORT"), DB_PORT),
            user: get("DB_USER", "user"),
            password: get("DB_PASSWORD", "pass"),
            name: get("DB_NAME", "godops"),
            sslmode: get("DB_SSLMODE", "disable"),
            max_connections: lenient(lookup("DB_MAX_CONNECTIONS"), DB_MAX_CONNECTIONS),
            connect_timeout_secs: lenient(lookup("DB_CONNECT_TIMEOUT_SECS"), DB_CONNECT_TIMEOUT_SECS),
        };

        let defaults = LogConfig::for_service(service_name);
        let log = LogConfig {
            level: get("LOG_LEVEL", &defaults.level),
            format: get("LOG_FORMAT", &defaults.format),
            output: get("LOG_OUTPUT", &defaults.output),
            file_path: get("LOG_FILE_PATH", &defaults.file_path),
            max_size_mb: lenient(lookup("LOG_MAX_SIZE"), defaults.max_size_mb),
            max_backups: lenient(lookup("LOG_MAX_BACKUPS"), defaults.max_backups),
            max_age_days: lenient(lookup("LOG_MAX_AGE"), defaults.max_age_days),
            compress: lenient(lookup("LOG_COMPRESS"), defaults.compress),
            service_name: service_name.to_string(),
        };

        Ok(Self {
            storage: StorageConfig {
                storage_type: get("STORAGE_TYPE", DEFAULT_STORAGE_TYPE),
                database,
            },
            server_port,
            request_timeout_secs: lenient(lookup("REQUEST_TIMEOUT_SECS"), REQUEST_TIMEOUT_SECS),
            log,
            app_env: get("APP_ENV", "development"),
        })
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        matches!(self.app_env.to_lowercase().as_str(), "production" | "prod")
    }
}

fn lenient<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
