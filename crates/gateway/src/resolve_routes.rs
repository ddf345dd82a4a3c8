//! The resolve API: one display field for a posted user record.

use std::sync::Arc;

use {
    axum::{Json, extract::State, http::StatusCode, response::IntoResponse},
    serde::Deserialize,
};

use visage_common::{DisguiseState, DisplayField, DisplayOptions, UserRecord, ViewContext};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub field: DisplayField,
    pub user: UserRecord,
    /// Present when the user is being viewed inside a course.
    #[serde(default)]
    pub course_id: Option<i64>,
    /// Resolve as if the context had an active disguise policy.
    #[serde(default)]
    pub disguised: bool,
    #[serde(default)]
    pub options: DisplayOptions,
}

/// `POST /api/resolve`
pub async fn api_resolve(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResolveRequest>,
) -> impl IntoResponse {
    let mut context = match request.course_id {
        Some(id) => ViewContext::course(id),
        None => ViewContext::site(),
    };
    if request.disguised {
        context = context.with_disguise(DisguiseState::Own(Arc::clone(&state.mask_policy)));
    }

    match state
        .chain
        .resolve(request.field, &request.user, Some(&context), &request.options)
        .await
    {
        Ok(value) => Json(serde_json::json!({
            "field": request.field,
            "value": value,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
