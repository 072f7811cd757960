//! Request logging middleware
//!
//! Logs one "started" entry before the handler runs and one "completed" entry
//! once the response body has been fully sent, failed, or been dropped. The
//! response body is wrapped in [`CountingBody`] so the byte count is what was
//! actually streamed to the client.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body::{Frame, SizeHint};
use orderly_core::Severity;

use super::request_id::get_request_id;

/// Request logging settings
#[derive(Debug, Clone, Default)]
pub struct RequestLogging {
    skip_paths: HashSet<String>,
}

impl RequestLogging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip both log entries for these exact paths (health checks and the like)
    pub fn with_skip_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            skip_paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn skips(&self, path: &str) -> bool {
        self.skip_paths.contains(path)
    }
}

/// Fields shared by the "started" and "completed" entries
#[derive(Debug)]
struct RequestFields {
    request_id: String,
    method: String,
    path: String,
    query: String,
    remote_addr: String,
    user_agent: String,
    content_type: String,
}

impl RequestFields {
    fn from_request(request: &Request) -> Self {
        let header = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            request_id: get_request_id(request).unwrap_or_default(),
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: mask_sensitive_query(request.uri().query().unwrap_or_default()),
            remote_addr: request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string())
                .unwrap_or_default(),
            user_agent: header(header::USER_AGENT),
            content_type: header(header::CONTENT_TYPE),
        }
    }
}

/// Mask values of query parameters whose names look like credentials
fn mask_sensitive_query(query: &str) -> String {
    const SENSITIVE_KEYWORDS: [&str; 5] = ["password", "token", "secret", "key", "authorization"];

    query
        .split('&')
        .filter(|param| !param.is_empty())
        .map(|param| match param.split_once('=') {
            Some((key, _)) => {
                let key_lower = key.to_lowercase();
                if SENSITIVE_KEYWORDS.iter().any(|kw| key_lower.contains(kw)) {
                    format!("{}=***MASKED***", key)
                } else {
                    param.to_string()
                }
            }
            None => param.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Severity and message of the "completed" entry for `status`
fn completion_level(status: StatusCode) -> (Severity, &'static str) {
    match status.as_u16() {
        500.. => (Severity::Error, "Request completed with server error"),
        404 => (Severity::Info, "Request completed with client error"),
        400..=499 => (Severity::Warn, "Request completed with client error"),
        300..=399 => (Severity::Info, "Request completed with redirect"),
        _ => (Severity::Info, "Request completed successfully"),
    }
}

/// Request logging middleware
pub async fn request_logging_middleware(
    State(settings): State<Arc<RequestLogging>>,
    request: Request,
    next: Next,
) -> Response {
    if settings.skips(request.uri().path()) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let fields = RequestFields::from_request(&request);

    tracing::info!(
        request_id = %fields.request_id,
        method = %fields.method,
        path = %fields.path,
        query = %fields.query,
        remote_addr = %fields.remote_addr,
        user_agent = %fields.user_agent,
        content_type = %fields.content_type,
        "Request started"
    );

    let response = next.run(request).await;
    let status = response.status();
    let (parts, body) = response.into_parts();

    let body = CountingBody {
        inner: body,
        bytes: 0,
        completion: Some(Completion {
            fields,
            status,
            start,
        }),
    };

    Response::from_parts(parts, Body::new(body))
}

/// Everything the "completed" entry needs besides the byte count
struct Completion {
    fields: RequestFields,
    status: StatusCode,
    start: Instant,
}

impl Completion {
    fn log(self, response_size: u64) {
        let Completion {
            fields,
            status,
            start,
        } = self;
        let duration_ms = start.elapsed().as_millis() as u64;
        let (severity, message) = completion_level(status);

        log_at!(
            severity,
            request_id = %fields.request_id,
            method = %fields.method,
            path = %fields.path,
            query = %fields.query,
            remote_addr = %fields.remote_addr,
            user_agent = %fields.user_agent,
            content_type = %fields.content_type,
            status_code = status.as_u16(),
            duration_ms,
            response_size,
            "{}",
            message
        );
    }
}

/// Response body decorator counting streamed data bytes.
///
/// The completion entry is logged exactly once: at end of stream, on a body
/// error, or when the body is dropped unfinished.
struct CountingBody {
    inner: Body,
    bytes: u64,
    completion: Option<Completion>,
}

impl CountingBody {
    fn finish(&mut self) {
        if let Some(completion) = self.completion.take() {
            completion.log(self.bytes);
        }
    }
}

impl http_body::Body for CountingBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.bytes += data.len() as u64;
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(err))) => {
                this.finish();
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.finish();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CountingBody {
    fn drop(&mut self) {
        self.finish();
    }
}
