//! Request instrumentation and form method override.

use super::AppState;
use crate::metrics::TagSet;
use axum::body::{Body, to_bytes};
use axum::extract::{MatchedPath, Request, State};
use axum::http::{Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;

const METRIC_REQUEST_DURATION: &str = "http.request.duration";
const METRIC_REQUESTS: &str = "http.requests";
const METRIC_ERRORS: &str = "http.errors";

/// Route tag used when no route matched the request.
const UNMATCHED_ROUTE: &str = "unknown";

/// Largest form body the method-override rewrite will buffer. Matches the
/// default request body limit so the rewrite never rejects a body the form
/// extractor would have accepted.
const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// Emits request metrics for every response.
///
/// Applied per route so the matched route template is present in request
/// extensions; the fallback carries no template and is tagged `unknown`.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
        .to_owned();

    let started = Instant::now();
    let response = next.run(request).await;
    let status = response.status();

    let request_tags = TagSet::new()
        .with("route", route.clone())
        .with("method", method)
        .with("status_code", status.as_u16().to_string());
    state.sink.histogram(
        METRIC_REQUEST_DURATION,
        started.elapsed().as_secs_f64(),
        request_tags.clone(),
    );
    state
        .sink
        .increment(METRIC_REQUESTS, 1, request_tags);
    if status.is_client_error() || status.is_server_error() {
        state.sink.increment(
            METRIC_ERRORS,
            1,
            TagSet::new()
                .with("route", route)
                .with("status_code", status.as_u16().to_string()),
        );
    }

    response
}

/// Rewrites `POST` form submissions carrying a `_method` field into the
/// verb they name.
///
/// Runs before routing; the buffered body is restored so the handler's form
/// extractor still sees it.
pub async fn rewrite_method_override(request: Request, next: Next) -> Response {
    if request.method() != Method::POST || !is_form_submission(&request) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let mut rebuilt = Request::from_parts(parts, Body::from(bytes.clone()));
    if let Some(method) = find_method_override(&bytes) {
        *rebuilt.method_mut() = method;
    }
    next.run(rebuilt).await
}

fn is_form_submission(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn find_method_override(body: &[u8]) -> Option<Method> {
    let text = std::str::from_utf8(body).ok()?;
    text.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name != "_method" {
            return None;
        }
        match value.to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    })
}
