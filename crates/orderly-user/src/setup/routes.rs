use std::sync::Arc;

use axum::{routing::get, Router};
use orderly_infra::{with_observability, RequestLogging};

use crate::handlers;
use crate::state::AppState;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/{id}", get(handlers::get_user))
        .route("/health", get(handlers::health))
        .with_state(state);

    with_observability(router, RequestLogging::with_skip_paths(["/health"]))
}
