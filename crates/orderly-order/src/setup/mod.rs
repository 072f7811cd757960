//! Application setup and initialization

pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use orderly_core::Config;
use orderly_db::create_order_repository;
use orderly_infra::HttpErrorHandler;

use crate::catalog::OrderErrorCatalog;
use crate::state::AppState;
use crate::usecase::{CreateOrder, GetOrderById};

/// Bind the configured repository and build the router
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    let repository = create_order_repository(&config.storage)
        .await
        .context("Failed to create order repository")?;

    tracing::info!(
        storage_type = %config.storage.storage_type,
        "Order repository ready"
    );

    let state = Arc::new(AppState {
        create_order: CreateOrder::new(repository.clone()),
        get_order: GetOrderById::new(repository),
        errors: HttpErrorHandler::new(OrderErrorCatalog),
        request_timeout: config.request_timeout(),
    });

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
