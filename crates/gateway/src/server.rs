use std::sync::Arc;

use {
    axum::{
        Json, Router,
        response::IntoResponse,
        routing::{get, post},
    },
    tokio::net::TcpListener,
    tracing::info,
};

use crate::{admin_routes, resolve_routes, state::AppState};

/// Assemble the admin/API router.
pub fn build_admin_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/admin/plugins", get(admin_routes::plugins_index))
        .route("/admin/plugins/action", post(admin_routes::plugins_action))
        .route("/api/plugins", get(admin_routes::api_plugins))
        .route("/api/resolve", post(resolve_routes::api_resolve))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Bind and serve until the process exits.
pub async fn serve(state: Arc<AppState>, bind: &str, port: u16) -> visage_common::Result<()> {
    let app = build_admin_app(state);
    let listener = TcpListener::bind((bind, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "visage gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
