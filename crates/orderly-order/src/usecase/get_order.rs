use std::sync::Arc;

use orderly_core::Order;
use orderly_db::Repository;

use crate::error::OrderError;

/// Looks up a single order
#[derive(Clone)]
pub struct GetOrderById {
    repository: Arc<dyn Repository<Order>>,
}

impl GetOrderById {
    pub fn new(repository: Arc<dyn Repository<Order>>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &str) -> Result<Order, OrderError> {
        if id.trim().is_empty() {
            return Err(OrderError::InvalidId);
        }

        match self.repository.find_by_id(id).await {
            Ok(order) => Ok(order),
            Err(e) if e.is_not_found() => Err(OrderError::NotFound),
            Err(e) => {
                tracing::error!(order_id = %id, error = %e, "Failed to load order from repository");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::OrderItem;
    use orderly_db::MemoryStore;

    #[tokio::test]
    async fn test_get_order() {
        let store = Arc::new(MemoryStore::<Order>::new());
        let order = Order::new(
            "o-1".to_string(),
            "u-1".to_string(),
            vec![OrderItem {
                product_id: "p".to_string(),
                quantity: 3,
                price: 2.0,
            }],
        );
        store.save(&order).await.unwrap();

        let use_case = GetOrderById::new(store);

        assert_eq!(use_case.execute("o-1").await.unwrap().id, "o-1");
        assert!(matches!(use_case.execute("o-2").await, Err(OrderError::NotFound)));
        assert!(matches!(use_case.execute(" ").await, Err(OrderError::InvalidId)));
    }
}
