//! Yearly K-Means analysis page handlers.

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
use crate::pages::{self, analysis::AnalysisPage};
use crate::report::ReportView;
use crate::state::SharedState;
use crate::views::ViewId;

#[derive(Deserialize)]
pub struct AnalysisForm {
    #[serde(default)]
    pub year: String,
}

pub async fn open_analysis(State(state): State<SharedState>) -> Redirect {
    let view = state.analysis_views.open(AnalysisPage::new(&state.config.analysis)).await;
    info!(view = %view.id(), "opened analysis view");
    Redirect::to(&format!("/analysis/{}", view.id()))
}

pub async fn analysis_page(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Response {
    let Some(view) = state.analysis_views.get(id).await else {
        return Redirect::to("/analysis").into_response();
    };
    let page = view.lock().await;
    let report = page.result().map(ReportView::from_report);
    render_page(
        &state,
        "analysis.html",
        context! {
            view_id => id,
            year => page.year(),
            min_year => page.bounds().start(),
            max_year => page.bounds().end(),
            loading => page.is_loading(),
            error => page.error(),
            report => report,
        },
    )
}

pub async fn analysis_submit(
    State(state): State<SharedState>,
    Path(id): Path<ViewId>,
    Form(form): Form<AnalysisForm>,
) -> Redirect {
    let Some(view) = state.analysis_views.get(id).await else {
        return Redirect::to("/analysis");
    };

    let driver = pages::analysis::run_submit(
        view,
        state.analysis_backend.clone(),
        state.events.clone(),
        form.year,
    );
    let outcome = pages::spawn_submit(driver).await;
    debug!(view = %id, ?outcome, "analysis submit settled");
    Redirect::to(&format!("/analysis/{id}"))
}

pub async fn analysis_close(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Redirect {
    if state.analysis_views.close(id).await {
        state.events.publish(id, ViewEventKind::Closed);
    }
    Redirect::to("/")
}
