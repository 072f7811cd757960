//! Domain models shared by the services

pub mod order;
pub mod user;

pub use order::{Order, OrderItem, OrderStatus};
pub use user::{User, UserValidationError};
