use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;

use crate::server::app::AppState;

/// Diagnostic response so a deployment can be checked for reachability
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub date: String,
    pub api: String,
    #[serde(rename = "Host")]
    pub host: String,
    #[serde(rename = "x-forwarded-for", skip_serializing_if = "Option::is_none")]
    pub x_forwarded_for: Option<String>,
    #[serde(rename = "x-original-host", skip_serializing_if = "Option::is_none")]
    pub x_original_host: Option<String>,
    #[serde(rename = "VerifierAuthority", skip_serializing_if = "Option::is_none")]
    pub verifier_authority: Option<String>,
    #[serde(rename = "clientId")]
    pub client_id: String,
}

/// Echo endpoint
///
/// Returns the request's own metadata plus the non-secret parts of the
/// configuration.
pub async fn echo_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Json<EchoResponse> {
    let host = hostname(&headers);
    let original_url = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    Json(EchoResponse {
        date: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        api: format!("http://{}{}", host, original_url),
        host,
        x_forwarded_for: header_string(&headers, "x-forwarded-for"),
        x_original_host: header_string(&headers, "x-original-host"),
        verifier_authority: state.config.verifier_authority.clone(),
        client_id: state.config.client_id.clone(),
    })
}

/// Host header without the port (IPv6 literals keep their brackets)
pub fn hostname(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => host.to_string(),
        };
    }

    host.split(':').next().unwrap_or_default().to_string()
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
