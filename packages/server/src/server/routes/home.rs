use anyhow::Context;
use axum::{extract::State, response::Html};
use tower_sessions::Session;

use crate::server::app::AppState;
use crate::server::auth::SESSION_STARTED_KEY;
use crate::server::error::AppError;

/// Home page: `index.html` from the public directory
///
/// Starts the browser session so later credential requests can be correlated
/// with it.
pub async fn home_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let started: Option<String> = session
        .get(SESSION_STARTED_KEY)
        .await
        .context("Failed to read session")?;
    if started.is_none() {
        session
            .insert(SESSION_STARTED_KEY, chrono::Utc::now().to_rfc3339())
            .await
            .context("Failed to start session")?;
    }

    let path = state.config.public_dir.join("index.html");

    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Ok(Html(page)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound(format!("{} does not exist", path.display())))
        }
        Err(e) => Err(AppError::Internal(
            anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
        )),
    }
}
