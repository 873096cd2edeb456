//! Landing page and liveness probe.

use axum::{extract::State, response::Response};
use minijinja::context;

use super::render_page;
use crate::state::SharedState;

pub async fn index(State(state): State<SharedState>) -> Response {
    render_page(&state, "index.html", context! {})
}

pub async fn health() -> &'static str {
    "edupanel is running"
}
