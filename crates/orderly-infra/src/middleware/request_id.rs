use axum::http::{HeaderName, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

/// Correlation header, read on the way in and echoed on the way out
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID extension type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Request ID middleware
/// Reuses a well-formed inbound `X-Request-ID` or generates a UUID v4, then makes
/// it visible in:
/// - Request headers and extensions (for handlers and later middleware)
/// - Response headers (X-Request-ID)
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| is_acceptable(id))
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Accepted and generated IDs are both visible ASCII
    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, value.clone());
    }
    request.extensions_mut().insert(RequestId(request_id));

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Extract request ID from request extensions
pub fn get_request_id(request: &Request) -> Option<String> {
    request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        http::Request as HttpRequest,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    /// Echo what the handler saw: extension value and request header
    async fn echo(Extension(id): Extension<RequestId>, request: Request) -> String {
        let header = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default()
            .to_string();
        format!("{}|{}", id.0, header)
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo))
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn call(request_id: Option<&str>) -> (String, String) {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(id) = request_id {
            builder = builder.header("x-request-id", id);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let header = response
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_inbound_id_is_propagated() {
        let (header, seen) = call(Some("abc-123")).await;
        assert_eq!(header, "abc-123");
        assert_eq!(seen, "abc-123|abc-123");
    }

    #[tokio::test]
    async fn test_missing_id_is_generated() {
        let (header, seen) = call(None).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(seen, format!("{}|{}", header, header));
    }

    #[tokio::test]
    async fn test_blank_or_oversized_id_is_replaced() {
        let (header, _) = call(Some("   ")).await;
        assert!(Uuid::parse_str(&header).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let (header, _) = call(Some(&long)).await;
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[test]
    fn test_acceptable_ids() {
        assert!(is_acceptable("abc-123"));
        assert!(is_acceptable(&"a".repeat(MAX_REQUEST_ID_LEN)));
        assert!(!is_acceptable(""));
        assert!(!is_acceptable("has space"));
    }
}
