//! Staff assistant page handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;
use tracing::{debug, info};

use super::render_page;
use crate::events::ViewEventKind;
use crate::pages::{self, staff::StaffPage};
use crate::state::SharedState;
use crate::views::ViewId;

#[derive(Deserialize)]
pub struct StaffForm {
    #[serde(default)]
    pub message: String,
}

pub async fn open_staff(State(state): State<SharedState>) -> Redirect {
    let view = state.staff_views.open(StaffPage::new()).await;
    info!(view = %view.id(), "opened staff assistant view");
    Redirect::to(&format!("/staff/{}", view.id()))
}

pub async fn staff_page(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Response {
    let Some(view) = state.staff_views.get(id).await else {
        return Redirect::to("/staff").into_response();
    };
    let page = view.lock().await;
    render_page(
        &state,
        "staff.html",
        context! {
            view_id => id,
            transcript => page.transcript(),
            input => page.input(),
            loading => page.is_loading(),
        },
    )
}

pub async fn staff_submit(
    State(state): State<SharedState>,
    Path(id): Path<ViewId>,
    Form(form): Form<StaffForm>,
) -> Redirect {
    let Some(view) = state.staff_views.get(id).await else {
        return Redirect::to("/staff");
    };
    // refused while a request is pending; the page keeps the text for re-render
    let driver = pages::staff::run_submit(
        view,
        state.staff_backend.clone(),
        state.events.clone(),
        form.message,
    );
    let outcome = pages::spawn_submit(driver).await;
    debug!(view = %id, ?outcome, "staff submit settled");
    Redirect::to(&format!("/staff/{id}"))
}

pub async fn staff_close(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Redirect {
    if state.staff_views.close(id).await {
        state.events.publish(id, ViewEventKind::Closed);
    }
    Redirect::to("/")
}
