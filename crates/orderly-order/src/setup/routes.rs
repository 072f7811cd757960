//! Route configuration

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use orderly_infra::{with_observability, RequestLogging};

use crate::handlers;
use crate::state::AppState;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/orders", post(handlers::create_order))
        .route("/orders/{id}", get(handlers::get_order))
        .route("/health", get(handlers::health))
        .with_state(state);

    with_observability(router, RequestLogging::with_skip_paths(["/health"]))
}
