use std::time::Duration;

use tower_sessions::cookie::{time, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "vc.sid";

/// Session key recording when the browser first loaded the sample page
pub const SESSION_STARTED_KEY: &str = "startedAt";

/// Upper bound for session inactivity, keeps expiry dates representable
const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Cookie session layer backed by the in-memory store
///
/// Sessions expire after `ttl` without activity. The store drops expired
/// records when they are next loaded.
pub fn session_layer(store: MemoryStore, ttl: Duration) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_secure(false)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(inactivity_timeout(ttl)))
}

/// Session inactivity timeout, clamped to one year
pub fn inactivity_timeout(ttl: Duration) -> time::Duration {
    let ttl = ttl.min(MAX_SESSION_TTL);
    time::Duration::seconds(ttl.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactivity_timeout_follows_ttl() {
        assert_eq!(
            inactivity_timeout(Duration::from_secs(86400)),
            time::Duration::hours(24)
        );
        assert_eq!(inactivity_timeout(Duration::ZERO), time::Duration::ZERO);
    }

    #[test]
    fn test_inactivity_timeout_is_clamped() {
        assert_eq!(
            inactivity_timeout(Duration::from_secs(u64::MAX)),
            time::Duration::days(365)
        );
    }
}
