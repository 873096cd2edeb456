//! HTTP handlers for all web routes.

pub mod home;
pub mod chat;
pub mod staff;
pub mod analysis;
pub mod api;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::state::AppState;

/// Render a template, or a plain 500 if rendering fails.
pub(crate) fn render_page<S: Serialize>(state: &AppState, name: &str, ctx: S) -> Response {
    match state.templates.render(name, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}
