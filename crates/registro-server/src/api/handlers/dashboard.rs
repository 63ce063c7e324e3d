use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Redirect};
use tracing::warn;

use crate::AppState;

const BUILTIN_DASHBOARD: &str = include_str!("../../../static/index.html");

pub async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

/// Serves `index.html` from the static directory, or the bundled shell when
/// the deployment has none.
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let path = state.config.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "could not read dashboard");
            }
            Html(BUILTIN_DASHBOARD.to_owned())
        }
    }
}
