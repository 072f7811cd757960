//! Orderly DB Library
//!
//! Persistence for the Orderly services: the repository contract, a concurrency-safe
//! in-memory store, the PostgreSQL order adapter, and the factory that binds one
//! of them at startup.

pub mod factory;
pub mod memory;
pub mod postgres;
pub mod repository;

// Re-export commonly used types
pub use factory::create_order_repository;
pub use memory::MemoryStore;
pub use postgres::PgOrderRepository;
pub use repository::{Entity, Repository, RepositoryError, RepositoryResult};
