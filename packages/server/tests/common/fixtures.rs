//! Test fixtures shared by the integration tests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;

pub const TENANT_ID: &str = "11111111-2222-3333-4444-555555555555";
pub const CLIENT_ID: &str = "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";
pub const CLIENT_SECRET: &str = "super-secret-value";
pub const VERIFIER_AUTHORITY: &str = "did:web:verifier.example.com";

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><h1>Verified ID verifier sample</h1></body></html>";
pub const STYLES_CSS: &str = "body { font-family: sans-serif; }";

/// Unsigned JWT shaped like an Entra ID app-only access token.
pub fn access_token(roles: &[String]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT","alg":"RS256","kid":"test"}"#);
    let claims = json!({
        "aud": "3db474b9-6a0c-4840-96ac-1fceb342124f",
        "iss": format!("https://sts.windows.net/{}/", TENANT_ID),
        "tid": TENANT_ID,
        "appid": CLIENT_ID,
        "exp": chrono::Utc::now().timestamp() + 3599,
        "roles": roles,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}
