use axum::{extract::Request, http::header, middleware::Next, response::Response};
use tracing::info;

const TRACE_SEPARATOR: &str =
    "//****************************************************************************";

/// Middleware to log a request banner and its headers
///
/// Applied to the page and diagnostic routes so a deployment can be checked
/// from the server log.
pub async fn request_trace(request: Request, next: Next) -> Response {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    info!(
        "{}\n{}: {} http://{}{}",
        TRACE_SEPARATOR,
        timestamp,
        request.method(),
        host,
        url
    );
    info!("Headers:\n{:#?}", request.headers());

    next.run(request).await
}
