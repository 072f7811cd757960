//! PostgreSQL adapters
//!
//! Expected table layout for orders:
//!
//! ```sql
//! CREATE TABLE orders (
//!     id               TEXT PRIMARY KEY,
//!     user_id          TEXT NOT NULL,
//!     items            JSONB NOT NULL,
//!     status           TEXT NOT NULL,
//!     coupon_code      TEXT NOT NULL DEFAULT '',
//!     total            DOUBLE PRECISION NOT NULL,
//!     shipping_address TEXT NOT NULL DEFAULT '',
//!     created_at       TIMESTAMPTZ NOT NULL,
//!     updated_at       TIMESTAMPTZ NOT NULL
//! );
//! ```

mod order;

pub use order::PgOrderRepository;
