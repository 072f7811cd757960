//! HTTP handlers for the order service

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use orderly_core::{Order, OrderItem};
use orderly_infra::RequestMeta;
use serde::Deserialize;

use crate::error::OrderError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Run a use case under the per-request deadline
async fn with_deadline<T, F>(state: &AppState, fut: F) -> Result<T, OrderError>
where
    F: Future<Output = Result<T, OrderError>>,
{
    match tokio::time::timeout(state.request_timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(OrderError::Timeout),
    }
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected create order body");
            return state
                .errors
                .handle_validation_error(&meta, "Invalid request body");
        }
    };

    let result = with_deadline(
        &state,
        state.create_order.execute(&request.user_id, request.items),
    )
    .await;

    match result {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => state.errors.handle_error(&meta, &e),
    }
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Response {
    let result: Result<Order, OrderError> =
        with_deadline(&state, state.get_order.execute(&id)).await;

    match result {
        Ok(order) => Json(order).into_response(),
        Err(e) => state.errors.handle_error(&meta, &e),
    }
}

pub async fn health() -> &'static str {
    "OK"
}
