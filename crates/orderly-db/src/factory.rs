//! Repository factory
//!
//! Binds exactly one order repository per process. The durable branch pings the
//! backend once before returning, so an unreachable database fails startup
//! instead of the first request.

use std::sync::Arc;
use std::time::Duration;

use orderly_core::{DatabaseConfig, Order, StorageConfig, StorageKind};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::Connection;

use crate::memory::MemoryStore;
use crate::postgres::PgOrderRepository;
use crate::repository::{Repository, RepositoryError, RepositoryResult};

/// Create the order repository selected by `STORAGE_TYPE`
pub async fn create_order_repository(
    config: &StorageConfig,
) -> RepositoryResult<Arc<dyn Repository<Order>>> {
    let kind = config
        .kind()
        .map_err(|_| RepositoryError::UnsupportedStorage(config.storage_type.clone()))?;

    match kind {
        StorageKind::Memory => {
            tracing::info!(storage_type = %kind, "Using in-memory storage for orders");
            Ok(Arc::new(MemoryStore::<Order>::new()))
        }
        StorageKind::Postgres => {
            tracing::info!(storage_type = %kind, "Using PostgreSQL storage for orders");
            let repo = connect_postgres(config).await?;
            Ok(Arc::new(repo))
        }
    }
}

/// Connection options built field by field, so credentials need no URL escaping
fn connect_options(db: &DatabaseConfig) -> PgConnectOptions {
    let ssl_mode = db.sslmode.parse::<PgSslMode>().unwrap_or_else(|_| {
        tracing::warn!(sslmode = %db.sslmode, "Unknown DB_SSLMODE, using disable");
        PgSslMode::Disable
    });

    PgConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.user)
        .password(&db.password)
        .database(&db.name)
        .ssl_mode(ssl_mode)
}

async fn connect_postgres(config: &StorageConfig) -> RepositoryResult<PgOrderRepository> {
    let db = &config.database;
    let timeout = Duration::from_secs(db.connect_timeout_secs);

    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(timeout)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(connect_options(db))
        .await
        .map_err(|e| {
            RepositoryError::Connection(format!("failed to create postgres connection: {}", e))
        })?;

    let mut conn = pool.acquire().await.map_err(|e| {
        RepositoryError::Connection(format!("failed to acquire postgres connection: {}", e))
    })?;
    if let Err(e) = conn.ping().await {
        drop(conn);
        pool.close().await;
        return Err(RepositoryError::Connection(format!(
            "failed to ping database: {}",
            e
        )));
    }
    drop(conn);

    tracing::info!(
        host = %db.host,
        port = db.port,
        max_connections = db.max_connections,
        "Connected to PostgreSQL"
    );

    Ok(PgOrderRepository::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::DatabaseConfig;

    fn storage(storage_type: &str) -> StorageConfig {
        StorageConfig {
            storage_type: storage_type.to_string(),
            database: DatabaseConfig {
                host: "127.0.0.1".to_string(),
                // Nothing listens on port 1
                port: 1,
                connect_timeout_secs: 1,
                ..DatabaseConfig::default()
            },
        }
    }

    #[test]
    fn test_connect_options_keep_reserved_characters_out_of_the_address() {
        let db = DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "orders@svc".to_string(),
            password: "p@ss/w#rd?x=1".to_string(),
            name: "orders".to_string(),
            sslmode: "require".to_string(),
            ..DatabaseConfig::default()
        };

        let options = connect_options(&db);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "orders@svc");
        assert_eq!(options.get_database(), Some("orders"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_unknown_sslmode_falls_back_to_disable() {
        let db = DatabaseConfig {
            sslmode: "sometimes".to_string(),
            ..DatabaseConfig::default()
        };

        assert!(matches!(connect_options(&db).get_ssl_mode(), PgSslMode::Disable));
    }

    #[tokio::test]
    async fn test_memory_storage_builds_a_working_repository() {
        let repo = create_order_repository(&storage("memory")).await.unwrap();
        let order = Order::new("order-1".to_string(), "user-1".to_string(), Vec::new());

        repo.save(&order).await.unwrap();

        assert_eq!(repo.find_by_id("order-1").await.unwrap(), order);
    }

    #[tokio::test]
    async fn test_storage_type_is_case_insensitive() {
        assert!(create_order_repository(&storage("MEMORY")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unsupported_storage_is_rejected() {
        let result = create_order_repository(&storage("mongodb")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::UnsupportedStorage(kind)) if kind == "mongodb"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_postgres_fails_at_construction() {
        let result = create_order_repository(&storage("postgres")).await;
        assert!(matches!(result, Err(RepositoryError::Connection(_))));
    }
}
