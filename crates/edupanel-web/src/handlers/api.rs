//! JSON view of page state, for scripts and tests.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use edupanel_common::PanelError;
use serde_json::json;

use crate::state::SharedState;
use crate::views::ViewId;

/// GET /api/views/{id} — snapshot of whichever page the view belongs to.
pub async fn view_snapshot(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Response {
    if let Some(view) = state.chat_views.get(id).await {
        let page = view.lock().await;
        return Json(json!({ "kind": "chat", "view_id": id, "state": page.snapshot() })).into_response();
    }
    if let Some(view) = state.staff_views.get(id).await {
        let page = view.lock().await;
        return Json(json!({ "kind": "staff", "view_id": id, "state": page.snapshot() })).into_response();
    }
    if let Some(view) = state.analysis_views.get(id).await {
        let page = view.lock().await;
        return Json(json!({ "kind": "analysis", "view_id": id, "state": page.snapshot() })).into_response();
    }
    let err = PanelError::ViewNotFound(id);
    (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
}
