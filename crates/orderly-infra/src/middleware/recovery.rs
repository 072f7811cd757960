use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use futures::FutureExt;
use orderly_core::ErrorRecord;

use super::request_id::get_request_id;

/// Panic recovery middleware
///
/// A panic while producing the response is logged and turned into a generic 500
/// so the connection and the process keep serving. A panic raised while the
/// body is already streaming happens after the status line is sent and cannot
/// be converted here.
pub async fn panic_recovery_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = get_request_id(&request);

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            tracing::error!(
                request_id = request_id.as_deref(),
                method = %method,
                path = %path,
                panic = %panic_message(payload.as_ref()),
                "Panic recovered in HTTP handler"
            );

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRecord::internal()),
            )
                .into_response()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use axum::{
        body::{to_bytes, Body},
        http::Request as HttpRequest,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;
    use tracing::Level;

    async fn explode() -> &'static str {
        panic!("index out of range")
    }

    async fn explode_formatted() -> &'static str {
        let id = 42;
        panic!("order {} vanished", id)
    }

    fn app() -> Router {
        Router::new()
            .route("/explode", get(explode))
            .route("/formatted", get(explode_formatted))
            .route("/calm", get(|| async { "calm" }))
            .layer(middleware::from_fn(panic_recovery_middleware))
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        let (logs, _guard) = capture_logs();

        let response = app()
            .oneshot(HttpRequest::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error_code"], "SYSTEM_INTERNAL_ERROR");

        let events = logs.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::ERROR);
        assert_eq!(events[0].field("panic"), Some("index out of range"));
        assert_eq!(events[0].field("path"), Some("/explode"));
        assert_eq!(events[0].field("method"), Some("GET"));
    }

    #[tokio::test]
    async fn test_formatted_panic_message_is_recovered() {
        let (logs, _guard) = capture_logs();

        let response = app()
            .oneshot(HttpRequest::builder().uri("/formatted").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(logs.events()[0].field("panic"), Some("order 42 vanished"));
    }

    #[tokio::test]
    async fn test_normal_responses_pass_through() {
        let (logs, _guard) = capture_logs();

        let response = app()
            .oneshot(HttpRequest::builder().uri("/calm").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(logs.events().is_empty());
    }
}
