use std::time::Duration;

use orderly_infra::HttpErrorHandler;

use crate::catalog::OrderErrorCatalog;
use crate::usecase::{CreateOrder, GetOrderById};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub create_order: CreateOrder,
    pub get_order: GetOrderById,
    pub errors: HttpErrorHandler<OrderErrorCatalog>,
    pub request_timeout: Duration,
}
