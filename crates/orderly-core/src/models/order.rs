use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Invalid order status: {}", other)),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: i32,
    pub price: f64,
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    #[serde(default)]
    pub coupon_code: String,
    pub total: f64,
    #[serde(default)]
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New pending order. The total is computed from the items.
    pub fn new(id: String, user_id: String, items: Vec<OrderItem>) -> Self {
        let total = items.iter().map(OrderItem::subtotal).sum();
        let now = Utc::now();
        Self {
            id,
            user_id,
            items,
            status: OrderStatus::Pending,
            coupon_code: String::new(),
            total,
            shipping_address: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_is_pending_with_total() {
        let order = Order::new(
            "o-1".to_string(),
            "u-1".to_string(),
            vec![
                OrderItem {
                    product_id: "p-1".to_string(),
                    quantity: 2,
                    price: 10.5,
                },
                OrderItem {
                    product_id: "p-2".to_string(),
                    quantity: 1,
                    price: 4.0,
                },
            ],
        );

        assert!(order.status.is_pending());
        assert_eq!(order.total, 25.0);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        assert_eq!("COMPLETED".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }
}
