pub mod github;
pub mod go;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::AppState;

async fn healthz() -> &'static str {
    "ok"
}

/// Create router for the webhook endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/GitHubWebhook", post(github::github_webhook))
        .route("/GoWebhook", post(go::go_webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Outbound notification and malformed payload failures abort the request.
pub(crate) fn internal_error(context: &str, e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!(error = %e, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{}: {}", context, e),
    )
}
