//! Plugin administration: the HTML index and the action endpoint.

use std::sync::Arc;

use {
    askama::Template,
    axum::{
        Form, Json,
        extract::State,
        http::StatusCode,
        response::{Html, IntoResponse, Redirect},
    },
    serde::Deserialize,
    tracing::{info, warn},
};

use crate::state::AppState;

// ── Index page ──────────────────────────────────────────────────────────────

struct PluginRow {
    name: String,
    sort_order: i64,
    enabled: bool,
    can_up: bool,
    can_down: bool,
}

#[derive(Template)]
#[template(path = "plugins.html")]
struct PluginsPage<'a> {
    rows: Vec<PluginRow>,
    sesskey: &'a str,
}

/// `GET /admin/plugins` — table of installed plugins with controls.
pub async fn plugins_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entries = match state.registry.list_all().await {
        Ok(entries) => entries,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        },
    };

    let last = entries.len().saturating_sub(1);
    let rows = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| PluginRow {
            name: entry.name,
            sort_order: entry.sort_order,
            enabled: entry.enabled,
            can_up: index > 0,
            can_down: index < last,
        })
        .collect();

    let page = PluginsPage {
        rows,
        sesskey: &state.sesskey,
    };
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// `GET /api/plugins` — JSON listing of all entries in rank order.
pub async fn api_plugins(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.registry.list_all().await {
        Ok(entries) => Json(serde_json::json!({ "plugins": entries })).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

// ── Action endpoint ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub action: String,
    pub plugin: String,
    pub sesskey: String,
}

enum AdminAction {
    Up,
    Down,
    Enable,
    Disable,
    Uninstall,
}

impl AdminAction {
    fn parse(action: &str) -> Option<Self> {
        match action {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "enable" => Some(Self::Enable),
            "disable" => Some(Self::Disable),
            "uninstall" => Some(Self::Uninstall),
            _ => None,
        }
    }
}

/// `POST /admin/plugins/action` — apply one registry mutation, then redirect
/// back to the index. Unknown plugin names are no-ops; unknown actions and a
/// bad sesskey are rejected without touching state.
pub async fn plugins_action(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ActionForm>,
) -> impl IntoResponse {
    if form.sesskey != state.sesskey {
        warn!(plugin = %form.plugin, "admin action with stale or missing sesskey");
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "invalid sesskey" })),
        )
            .into_response();
    }

    let Some(action) = AdminAction::parse(&form.action) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("invalid action {:?}", form.action) })),
        )
            .into_response();
    };

    let plugin = form.plugin.as_str();
    let result = match action {
        AdminAction::Up => state.registry.move_up(plugin).await.map(|_| ()),
        AdminAction::Down => state.registry.move_down(plugin).await.map(|_| ()),
        AdminAction::Enable => state.registry.enable(plugin).await,
        AdminAction::Disable => state.registry.disable(plugin).await,
        AdminAction::Uninstall => state.registry.uninstall(plugin).await,
    };

    match result {
        Ok(()) => {
            info!(action = %form.action, plugin, "admin action applied");
            Redirect::to("/admin/plugins").into_response()
        },
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
