use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orderly_core::{Order, OrderItem, OrderStatus};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    items: Json<Vec<OrderItem>>,
    status: String,
    coupon_code: String,
    total: f64,
    shipping_address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::InvalidRecord)?;

        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            status,
            coupon_code: row.coupon_code,
            total: row.total,
            shipping_address: row.shipping_address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Order repository backed by an already-connected pool
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Order> for PgOrderRepository {
    #[tracing::instrument(skip(self, order), fields(db.table = "orders", db.operation = "upsert", db.record_id = %order.id))]
    async fn save(&self, order: &Order) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, items, status, coupon_code, total, shipping_address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                items = EXCLUDED.items,
                status = EXCLUDED.status,
                coupon_code = EXCLUDED.coupon_code,
                total = EXCLUDED.total,
                shipping_address = EXCLUDED.shipping_address,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(Json(&order.items))
        .bind(order.status.as_str())
        .bind(&order.coupon_code)
        .bind(order.total)
        .bind(&order.shipping_address)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "orders", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Order> {
        let row = sqlx::query_as::<Postgres, OrderRow>(
            r#"
            SELECT id, user_id, items, status, coupon_code, total, shipping_address, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        Order::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> OrderRow {
        let now = Utc::now();
        OrderRow {
            id: "order-1".to_string(),
            user_id: "user-1".to_string(),
            items: Json(vec![OrderItem {
                product_id: "prod-1".to_string(),
                quantity: 3,
                price: 2.5,
            }]),
            status: status.to_string(),
            coupon_code: String::new(),
            total: 7.5,
            shipping_address: "1 Main St".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_converts_to_order() {
        let order = Order::try_from(row("COMPLETED")).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.shipping_address, "1 Main St");
    }

    #[test]
    fn test_unknown_status_is_invalid_record() {
        let err = Order::try_from(row("SHIPPED")).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidRecord(_)));
    }
}
