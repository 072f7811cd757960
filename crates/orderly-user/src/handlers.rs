use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use orderly_infra::RequestMeta;
use serde::Deserialize;

use crate::error::UserError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

async fn with_deadline<T, F>(state: &AppState, fut: F) -> Result<T, UserError>
where
    F: Future<Output = Result<T, UserError>>,
{
    tokio::time::timeout(state.request_timeout, fut)
        .await
        .unwrap_or(Err(UserError::Timeout))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return state
            .errors
            .handle_validation_error(&meta, "Invalid request body");
    };

    match with_deadline(&state, state.users.create_user(&request.name, &request.email)).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => state.errors.handle_error(&meta, &e),
    }
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Response {
    match with_deadline(&state, state.users.get_user(&id)).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => state.errors.handle_error(&meta, &e),
    }
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<orderly_core::User>> {
    Json(state.users.list_users().await)
}

pub async fn health() -> &'static str {
    "OK"
}
