//! Application setup and initialization

pub mod routes;

use std::sync::Arc;

use orderly_core::{Config, User};
use orderly_db::MemoryStore;
use orderly_infra::HttpErrorHandler;

use crate::catalog::UserErrorCatalog;
use crate::service::UserService;
use crate::state::AppState;

pub fn initialize_app(config: &Config) -> (Arc<AppState>, axum::Router) {
    let state = Arc::new(AppState {
        users: UserService::new(Arc::new(MemoryStore::<User>::new())),
        errors: HttpErrorHandler::new(UserErrorCatalog),
        request_timeout: config.request_timeout(),
    });

    tracing::info!("User store ready");

    let router = routes::setup_routes(state.clone());
    (state, router)
}
