//! Axum router — maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    home::{index, health},
    chat::{open_chat, chat_page, chat_submit, chat_close},
    staff::{open_staff, staff_page, staff_submit, staff_close},
    analysis::{open_analysis, analysis_page, analysis_submit, analysis_close},
    api::view_snapshot,
};
use crate::sse::view_events;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",                     get(index))
        .route("/chat",                 get(open_chat))
        .route("/chat/{id}",            get(chat_page).post(chat_submit))
        .route("/chat/{id}/close",      post(chat_close))
        .route("/staff",                get(open_staff))
        .route("/staff/{id}",           get(staff_page).post(staff_submit))
        .route("/staff/{id}/close",     post(staff_close))
        .route("/analysis",             get(open_analysis))
        .route("/analysis/{id}",        get(analysis_page).post(analysis_submit))
        .route("/analysis/{id}/close",  post(analysis_close))

        // SSE streaming
        .route("/api/views/{id}/events", get(view_events))

        // API endpoints
        .route("/api/views/{id}",       get(view_snapshot))
        .route("/health",               get(health))

        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
