//! HTTP error translation
//!
//! [`HttpErrorHandler`] turns a domain error into exactly one JSON response and
//! exactly one structured log entry. It never looks at the error itself: status
//! and severity come from the service's [`ErrorCatalog`] and from the stable
//! error code it returns.

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::Response,
};
use orderly_core::{ErrorCatalog, ErrorRecord, Severity};

use crate::middleware::{RequestId, REQUEST_ID_HEADER};

/// Markers matched anywhere in an error code, first match wins
const STATUS_MARKERS: &[(&str, StatusCode)] = &[
    ("NOT_FOUND", StatusCode::NOT_FOUND),
    ("ALREADY_EXISTS", StatusCode::CONFLICT),
    ("TIMEOUT", StatusCode::REQUEST_TIMEOUT),
    ("SERVICE_UNAVAILABLE", StatusCode::SERVICE_UNAVAILABLE),
];

/// Prefixes checked after every marker
const STATUS_PREFIXES: &[(&str, StatusCode)] = &[
    ("VALIDATION_", StatusCode::BAD_REQUEST),
    ("DATABASE_", StatusCode::INTERNAL_SERVER_ERROR),
];

/// Map a stable error code to an HTTP status
pub fn status_for_code(code: &str) -> StatusCode {
    STATUS_MARKERS
        .iter()
        .find(|(marker, _)| code.contains(marker))
        .or_else(|| {
            STATUS_PREFIXES
                .iter()
                .find(|(prefix, _)| code.starts_with(prefix))
        })
        .map(|(_, status)| *status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Request details attached to every error log entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub method: String,
    pub path: String,
    pub user_agent: String,
    pub request_id: Option<String>,
}

impl RequestMeta {
    pub fn from_parts(parts: &Parts) -> Self {
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .or_else(|| {
                parts
                    .headers
                    .get(REQUEST_ID_HEADER)
                    .and_then(|h| h.to_str().ok())
                    .filter(|id| !id.is_empty())
                    .map(String::from)
            });

        Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            user_agent: parts
                .headers
                .get(header::USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default()
                .to_string(),
            request_id,
        }
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Translates domain errors into HTTP responses using a service's catalog
pub struct HttpErrorHandler<C> {
    catalog: Arc<C>,
}

impl<C> Clone for HttpErrorHandler<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<C: ErrorCatalog> HttpErrorHandler<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Status for `err`: validation and database classes win over the code table.
    pub fn status_for(&self, err: &C::Error, record: &ErrorRecord) -> StatusCode {
        if self.catalog.is_validation_error(err) {
            StatusCode::BAD_REQUEST
        } else if self.catalog.is_database_error(err) {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            status_for_code(&record.code)
        }
    }

    pub fn handle_error(&self, meta: &RequestMeta, err: &C::Error) -> Response {
        let record = self.catalog.classify(err);
        let status = self.status_for(err, &record);

        let (severity, message) = if self.catalog.is_validation_error(err) {
            (Severity::Warn, "Validation error occurred")
        } else if self.catalog.is_database_error(err) {
            (Severity::Error, "Database error occurred")
        } else if status.is_server_error() {
            (Severity::Error, "Internal server error occurred")
        } else {
            (Severity::Info, "Request completed with error")
        };

        log_at!(
            severity,
            error_code = %record.code,
            error_message = %record.message,
            status_code = status.as_u16(),
            method = %meta.method,
            path = %meta.path,
            user_agent = %meta.user_agent,
            request_id = meta.request_id.as_deref(),
            "{}",
            message
        );

        write_error_response(status, &record, err)
    }

    /// 400 with a caller-supplied message. A blank message gets a generic one.
    pub fn handle_validation_error(&self, meta: &RequestMeta, message: &str) -> Response {
        let record = ErrorRecord::validation(message);
        let status = StatusCode::BAD_REQUEST;

        tracing::warn!(
            error_code = %record.code,
            error_message = %record.message,
            status_code = status.as_u16(),
            method = %meta.method,
            path = %meta.path,
            user_agent = %meta.user_agent,
            request_id = meta.request_id.as_deref(),
            "Validation error occurred"
        );

        write_error_response(status, &record, &record.message)
    }

    /// Generic 500. The original error stays in the logs only.
    pub fn handle_internal_error(
        &self,
        meta: &RequestMeta,
        err: &(dyn std::error::Error + 'static),
    ) -> Response {
        let record = ErrorRecord::internal();
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let original_error = error_chain(err);

        tracing::error!(
            original_error = %original_error,
            error_code = %record.code,
            status_code = status.as_u16(),
            method = %meta.method,
            path = %meta.path,
            user_agent = %meta.user_agent,
            request_id = meta.request_id.as_deref(),
            "Internal server error occurred"
        );

        write_error_response(status, &record, &original_error)
    }
}

/// Render `err` and its sources as `outer: inner: root`
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn write_error_response(
    status: StatusCode,
    record: &ErrorRecord,
    original_error: &dyn Display,
) -> Response {
    let body = match serde_json::to_vec(record) {
        Ok(bytes) => Body::from(bytes),
        Err(encode_error) => {
            tracing::error!(
                original_error = %original_error,
                encode_error = %encode_error,
                "Failed to encode error response"
            );
            Body::empty()
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
