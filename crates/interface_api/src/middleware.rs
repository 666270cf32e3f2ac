//! API middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use chrono::Utc;
use tracing::{info, warn};

/// Request logging middleware
///
/// Logs method, path, status and duration of every API request, at `warn`
/// for rejected requests.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = %status.as_u16(),
            duration_ms = duration.num_milliseconds(),
            "API request rejected"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = %status.as_u16(),
            duration_ms = duration.num_milliseconds(),
            "API request"
        );
    }

    response
}
