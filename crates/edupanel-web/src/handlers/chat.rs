//! Generic chat page handlers.

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
use crate::pages::{self, chat::ChatPage};
use crate::state::SharedState;
use crate::views::ViewId;

#[derive(Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub async fn open_chat(State(state): State<SharedState>) -> Redirect {
    let view = state.chat_views.open(ChatPage::new(state.config.chat.overlap_policy)).await;
    info!(view = %view.id(), "opened chat view");
    Redirect::to(&format!("/chat/{}", view.id()))
}

pub async fn chat_page(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Response {
    let Some(view) = state.chat_views.get(id).await else {
        return Redirect::to("/chat").into_response();
    };
    let page = view.lock().await;
    render_page(
        &state,
        "chat.html",
        context! {
            view_id => id,
            transcript => page.transcript(),
            input => page.input(),
            alert => page.alert(),
            loading => page.is_loading(),
        },
    )
}

pub async fn chat_submit(
    State(state): State<SharedState>,
    Path(id): Path<ViewId>,
    Form(form): Form<ChatForm>,
) -> Redirect {
    let Some(view) = state.chat_views.get(id).await else {
        return Redirect::to("/chat");
    };
    let driver = pages::chat::run_submit(
        view,
        state.chat_backend.clone(),
        state.events.clone(),
        form.message,
    );
    let outcome = pages::spawn_submit(driver).await;
    debug!(view = %id, ?outcome, "chat submit settled");
    Redirect::to(&format!("/chat/{id}"))
}

pub async fn chat_close(State(state): State<SharedState>, Path(id): Path<ViewId>) -> Redirect {
    if state.chat_views.close(id).await {
        state.events.publish(id, ViewEventKind::Closed);
    }
    Redirect::to("/")
}
