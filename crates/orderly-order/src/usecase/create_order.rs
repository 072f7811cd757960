use std::sync::Arc;

use orderly_core::{Order, OrderItem};
use orderly_db::Repository;
use uuid::Uuid;

use crate::error::OrderError;

/// Validates and persists a new order
#[derive(Clone)]
pub struct CreateOrder {
    repository: Arc<dyn Repository<Order>>,
}

impl CreateOrder {
    pub fn new(repository: Arc<dyn Repository<Order>>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, user_id: &str, items: Vec<OrderItem>) -> Result<Order, OrderError> {
        tracing::debug!(
            use_case = "create_order",
            user_id = %user_id,
            items_count = items.len(),
            "Starting create order use case"
        );

        validate(user_id, &items)?;

        let order = Order::new(Uuid::new_v4().to_string(), user_id.to_string(), items);

        if let Err(e) = self.repository.save(&order).await {
            tracing::error!(
                use_case = "create_order",
                order_id = %order.id,
                user_id = %user_id,
                error = %e,
                "Failed to save order to repository"
            );
            return Err(e.into());
        }

        tracing::info!(
            use_case = "create_order",
            order_id = %order.id,
            user_id = %user_id,
            items_count = order.items.len(),
            total = order.total,
            "Order created successfully"
        );

        Ok(order)
    }
}

fn validate(user_id: &str, items: &[OrderItem]) -> Result<(), OrderError> {
    if user_id.trim().is_empty() {
        tracing::warn!(use_case = "create_order", "Create order failed: missing user ID");
        return Err(OrderError::MissingUserId);
    }

    if items.is_empty() {
        tracing::warn!(
            use_case = "create_order",
            user_id = %user_id,
            "Create order failed: no items provided"
        );
        return Err(OrderError::EmptyItems);
    }

    for (item_index, item) in items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            tracing::warn!(
                use_case = "create_order",
                user_id = %user_id,
                item_index,
                "Create order failed: missing product ID"
            );
            return Err(OrderError::MissingProductId);
        }
        if item.quantity <= 0 {
            tracing::warn!(
                use_case = "create_order",
                user_id = %user_id,
                item_index,
                product_id = %item.product_id,
                quantity = item.quantity,
                "Create order failed: invalid quantity"
            );
            return Err(OrderError::InvalidQuantity);
        }
        if item.price <= 0.0 {
            tracing::warn!(
                use_case = "create_order",
                user_id = %user_id,
                item_index,
                product_id = %item.product_id,
                price = item.price,
                "Create order failed: invalid price"
            );
            return Err(OrderError::InvalidPrice);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use orderly_core::OrderStatus;
    use orderly_db::{MemoryStore, RepositoryError, RepositoryResult};
    use orderly_infra::test_support::capture_logs;
    use tracing::Level;

    struct BrokenRepository;

    #[async_trait]
    impl Repository<Order> for BrokenRepository {
        async fn save(&self, _order: &Order) -> RepositoryResult<()> {
            Err(RepositoryError::Connection("connection refused".into()))
        }

        async fn find_by_id(&self, id: &str) -> RepositoryResult<Order> {
            Err(RepositoryError::NotFound(id.to_string()))
        }
    }

    fn item(product_id: &str, quantity: i32, price: f64) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            quantity,
            price,
        }
    }

    #[tokio::test]
    async fn test_creates_pending_order_with_total() {
        let store = Arc::new(MemoryStore::<Order>::new());
        let use_case = CreateOrder::new(store.clone());

        let order = use_case
            .execute("user-1", vec![item("p-1", 2, 10.5), item("p-2", 1, 4.0)])
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, "user-1");
        assert!((order.total - 25.0).abs() < f64::EPSILON);
        assert!(Uuid::parse_str(&order.id).is_ok());

        let stored = store.find_by_id(&order.id).await.unwrap();
        assert_eq!(stored.items.len(), 2);
    }

    #[tokio::test]
    async fn test_validation_rules_in_order() {
        let use_case = CreateOrder::new(Arc::new(MemoryStore::<Order>::new()));

        let result = use_case.execute("  ", vec![]).await;
        assert!(matches!(result, Err(OrderError::MissingUserId)));

        let result = use_case.execute("u", vec![]).await;
        assert!(matches!(result, Err(OrderError::EmptyItems)));

        let result = use_case.execute("u", vec![item("", 0, 0.0)]).await;
        assert!(matches!(result, Err(OrderError::MissingProductId)));

        let result = use_case.execute("u", vec![item("p", 0, 1.0)]).await;
        assert!(matches!(result, Err(OrderError::InvalidQuantity)));

        let result = use_case.execute("u", vec![item("p", 1, -2.0)]).await;
        assert!(matches!(result, Err(OrderError::InvalidPrice)));
    }

    #[tokio::test]
    async fn test_rejection_is_logged_with_item_index() {
        let (logs, _guard) = capture_logs();
        let use_case = CreateOrder::new(Arc::new(MemoryStore::<Order>::new()));

        let _ = use_case
            .execute("u", vec![item("p", 1, 1.0), item("", 1, 1.0)])
            .await;

        let events = logs.with_message("Create order failed: missing product ID");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(events[0].field("item_index"), Some("1"));
    }

    #[tokio::test]
    async fn test_repository_failure_becomes_database_error() {
        let (logs, _guard) = capture_logs();
        let use_case = CreateOrder::new(Arc::new(BrokenRepository));

        let result = use_case.execute("u", vec![item("p", 1, 1.0)]).await;

        assert!(matches!(result, Err(OrderError::DatabaseConnection(_))));
        let events = logs.with_message("Failed to save order to repository");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::ERROR);
    }
}
