//! Cross-cutting request middleware.
//!
//! Layer order is decided in [`crate::app::apply_middleware`]; every function
//! here is written to be used with `axum::middleware::from_fn[_with_state]`.

use std::any::Any;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::watch;

use orgbook_core::TenantId;
use orgbook_observability::HttpMetrics;

use crate::app::errors::{ApiError, ApiErrorReason, ErrorResponse, LOCATION_PATH};
use crate::context::TenantContext;

/// Error bodies larger than this are not inspected; the reason phrase is used instead.
const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Attach the configured tenant to every request.
pub async fn tenant_context(
    State(tenant_id): State<TenantId>,
    mut req: Request,
    next: Next,
) -> Response {
    req.extensions_mut().insert(TenantContext::new(tenant_id));
    next.run(req).await
}

/// Refuse new work once shutdown has been signalled.
pub async fn drain_guard(
    State(shutdown): State<watch::Receiver<bool>>,
    req: Request,
    next: Next,
) -> Response {
    if *shutdown.borrow() {
        tracing::debug!(path = %req.uri().path(), "rejecting request while draining");
        return ErrorResponse::plain(StatusCode::SERVICE_UNAVAILABLE, "server is shutting down")
            .into_response();
    }
    next.run(req).await
}

/// Count requests, responses by status class and latency.
///
/// If the request future is dropped mid-flight the guard still releases the
/// in-flight gauge and records the request as aborted.
pub async fn track_metrics(
    State(metrics): State<HttpMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let guard = metrics.start_request();
    let response = next.run(req).await;
    guard.finish(response.status().as_u16());
    response
}

/// Rewrite error responses that are not already an [`ErrorResponse`].
///
/// Covers everything produced outside our handlers: unknown routes, method
/// mismatches, body-limit rejections and plain-text extractor rejections.
pub async fn translate_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(response.headers()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let text = axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_owned())
        .unwrap_or_default();

    let envelope = if status == StatusCode::NOT_FOUND {
        ErrorResponse::new(
            status,
            format!("no route for {method} {path}"),
            vec![ApiError::new(
                format!("no route for {method} {path}"),
                ApiErrorReason::NotFound,
                LOCATION_PATH,
                path,
            )],
        )
    } else {
        let message = if text.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_owned()
        } else {
            text
        };
        ErrorResponse::plain(status, message)
    };

    let mut translated = envelope.into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            translated.headers_mut().append(name.clone(), value.clone());
        }
    }
    translated
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Builds the 500 response for a handler panic (used with `CatchPanicLayer`).
#[derive(Clone)]
pub struct PanicResponder {
    metrics: HttpMetrics,
}

impl PanicResponder {
    pub fn new(metrics: HttpMetrics) -> Self {
        Self { metrics }
    }
}

impl tower_http::catch_panic::ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.as_str()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            *s
        } else {
            "unknown panic payload"
        };
        tracing::error!(panic = %detail, "handler panicked");
        self.metrics.panic_caught();

        ErrorResponse::plain(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            .into_response()
    }
}
