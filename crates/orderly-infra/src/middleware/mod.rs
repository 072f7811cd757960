//! Request pipeline middleware
//!
//! Three independent stages, composed by [`with_observability`] as (outermost
//! first) request ID, panic recovery, request logging.

pub mod logging;
pub mod recovery;
pub mod request_id;

use std::sync::Arc;

use axum::{middleware, Router};

pub use logging::{request_logging_middleware, RequestLogging};
pub use recovery::panic_recovery_middleware;
pub use request_id::{get_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};

/// Wrap every route of `router` in the full request pipeline.
///
/// The request ID stage runs first so the recovery stage can log the ID and the
/// 500 it produces still carries `X-Request-ID`.
pub fn with_observability<S>(router: Router<S>, logging: RequestLogging) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(middleware::from_fn_with_state(
            Arc::new(logging),
            request_logging_middleware,
        ))
        .layer(middleware::from_fn(panic_recovery_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;
    use tracing::Level;

    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    fn app() -> Router {
        let router = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route("/boom", get(boom));
        with_observability(router, RequestLogging::default())
    }

    #[tokio::test]
    async fn test_full_pipeline_logs_with_request_id() {
        let (logs, _guard) = capture_logs();

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/ok")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
        to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let events = logs.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "Request started");
        assert_eq!(events[1].message, "Request completed successfully");
        for event in &events {
            assert_eq!(event.field("request_id"), Some("abc-123"));
        }
    }

    #[tokio::test]
    async fn test_panic_is_contained_and_service_keeps_serving() {
        let (logs, _guard) = capture_logs();
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let generated_id = response
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(!generated_id.is_empty());

        let errors: Vec<_> = logs
            .events()
            .into_iter()
            .filter(|event| event.level == Level::ERROR)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field("panic"), Some("handler exploded"));
        assert_eq!(errors[0].field("request_id"), Some(generated_id.as_str()));

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
