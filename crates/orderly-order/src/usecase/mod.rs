//! Order use cases

mod create_order;
mod get_order;

pub use create_order::CreateOrder;
pub use get_order::GetOrderById;
