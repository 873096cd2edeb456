//! Generic chat page: transcript of user/bot messages, bot replies may cite
//! sources, failures surface as a blocking alert.

use std::sync::Arc;

use edupanel_client::ChatBackend;
use edupanel_common::{ChatMessage, ChatReply, Result, Sender};
use edupanel_config::OverlapPolicy;
use serde::Serialize;
use tracing::{debug, warn};

use super::{accept_input, Settlement, SubmitGate, SubmitOutcome, Ticket};
use crate::events::{EventBus, ViewEventKind};
use crate::views::View;

#[derive(Debug)]
pub struct PendingChat {
    pub ticket: Ticket,
    pub message: String,
}

#[derive(Debug)]
pub struct ChatPage {
    transcript: Vec<ChatMessage>,
    input: String,
    alert: Option<String>,
    gate: SubmitGate,
}

#[derive(Debug, Serialize)]
pub struct ChatSnapshot<'a> {
    pub transcript: &'a [ChatMessage],
    pub input: &'a str,
    pub alert: Option<&'a str>,
    pub loading: bool,
}

impl ChatPage {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { transcript: Vec::new(), input: String::new(), alert: None, gate: SubmitGate::new(policy) }
    }

    pub fn transcript(&self) -> &[ChatMessage] { &self.transcript }
    pub fn input(&self) -> &str { &self.input }
    pub fn alert(&self) -> Option<&str> { self.alert.as_deref() }
    pub fn is_loading(&self) -> bool { self.gate.is_loading() }

    /// Append the user's message and clear the input. `None` for blank text
    /// (state untouched) or when the overlap policy refuses a second request
    /// (the text is kept in the input).
    pub fn begin_submit(&mut self, text: impl Into<String>) -> Option<PendingChat> {
        let (ticket, message) = accept_input(&mut self.input, text.into(), &mut self.gate)?;
        self.alert = None;
        self.transcript.push(ChatMessage::user(message.clone()));
        Some(PendingChat { ticket, message })
    }

    pub fn settle(&mut self, ticket: Ticket, outcome: Result<ChatReply>) -> Settlement {
        if !self.gate.finish(ticket) {
            return Settlement::Stale;
        }
        match outcome {
            Ok(reply) => self.transcript.push(reply.into_message()),
            Err(e) => self.alert = Some(format!("Error: {e}")),
        }
        Settlement::Applied
    }

    pub fn snapshot(&self) -> ChatSnapshot<'_> {
        ChatSnapshot {
            transcript: &self.transcript,
            input: &self.input,
            alert: self.alert(),
            loading: self.is_loading(),
        }
    }
}

/// Submit `text` as the next user message and apply the reply.
pub async fn run_submit(
    view: Arc<View<ChatPage>>,
    backend: Arc<dyn ChatBackend>,
    events: EventBus,
    text: String,
) -> SubmitOutcome {
    let pending = view.lock().await.begin_submit(text);
    let Some(PendingChat { ticket, message }) = pending else {
        return SubmitOutcome::Ignored;
    };
    events.publish(view.id(), ViewEventKind::MessageAppended { sender: Sender::User, text: message.clone() });
    events.publish(view.id(), ViewEventKind::Loading { loading: true });

    let outcome = backend.send_chat(&message).await;
    if let Err(e) = &outcome {
        warn!(view = %view.id(), endpoint = backend.endpoint(), status = ?e.status(), "chat request failed: {e}");
    }

    let mut page = view.lock().await;
    if view.is_closed() {
        debug!(view = %view.id(), "view closed, dropping chat response");
        return SubmitOutcome::ViewClosed;
    }
    let event = match &outcome {
        Ok(reply) => ViewEventKind::MessageAppended { sender: Sender::Bot, text: reply.text().to_string() },
        Err(e) => ViewEventKind::Alert { message: format!("Error: {e}") },
    };
    let settlement = page.settle(ticket, outcome);
    match settlement {
        Settlement::Applied => events.publish(view.id(), event),
        Settlement::Stale => debug!(view = %view.id(), "stale chat response discarded"),
    }
    events.publish(view.id(), ViewEventKind::Loading { loading: page.is_loading() });
    settlement.into()
}
