//! Staff assistant chat page. Same flow as the generic chat, but one request
//! at a time, and a failure becomes a fallback bot message instead of an alert.

use std::sync::Arc;

use edupanel_client::StaffBackend;
use edupanel_common::{chat::FALLBACK_REPLY_TEXT, ChatMessage, Result, Sender, StaffReply};
use edupanel_config::OverlapPolicy;
use serde::Serialize;
use tracing::{debug, warn};

use super::{accept_input, Settlement, SubmitGate, SubmitOutcome, Ticket};
use crate::events::{EventBus, ViewEventKind};
use crate::views::View;

#[derive(Debug)]
pub struct PendingStaff {
    pub ticket: Ticket,
    pub message: String,
}

#[derive(Debug)]
pub struct StaffPage {
    transcript: Vec<ChatMessage>,
    input: String,
    gate: SubmitGate,
}

#[derive(Debug, Serialize)]
pub struct StaffSnapshot<'a> {
    pub transcript: &'a [ChatMessage],
    pub input: &'a str,
    pub loading: bool,
}

impl Default for StaffPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StaffPage {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            input: String::new(),
            gate: SubmitGate::new(OverlapPolicy::RejectWhilePending),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] { &self.transcript }
    pub fn input(&self) -> &str { &self.input }
    pub fn is_loading(&self) -> bool { self.gate.is_loading() }

    pub fn begin_submit(&mut self, text: impl Into<String>) -> Option<PendingStaff> {
        let (ticket, message) = accept_input(&mut self.input, text.into(), &mut self.gate)?;
        self.transcript.push(ChatMessage::user(message.clone()));
        Some(PendingStaff { ticket, message })
    }

    /// Always appends exactly one bot message.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<StaffReply>) -> Settlement {
        if !self.gate.finish(ticket) {
            return Settlement::Stale;
        }
        let text = match &outcome {
            Ok(reply) => reply.text(),
            Err(_) => FALLBACK_REPLY_TEXT,
        };
        self.transcript.push(ChatMessage::bot(text));
        Settlement::Applied
    }

    pub fn snapshot(&self) -> StaffSnapshot<'_> {
        StaffSnapshot { transcript: &self.transcript, input: &self.input, loading: self.is_loading() }
    }
}

pub async fn run_submit(
    view: Arc<View<StaffPage>>,
    backend: Arc<dyn StaffBackend>,
    events: EventBus,
    text: String,
) -> SubmitOutcome {
    let pending = view.lock().await.begin_submit(text);
    let Some(PendingStaff { ticket, message }) = pending else {
        return SubmitOutcome::Ignored;
    };
    events.publish(view.id(), ViewEventKind::MessageAppended { sender: Sender::User, text: message.clone() });
    events.publish(view.id(), ViewEventKind::Loading { loading: true });

    let outcome = backend.ask_staff(&message).await;
    if let Err(e) = &outcome {
        warn!(view = %view.id(), endpoint = backend.endpoint(), status = ?e.status(), "staff request failed: {e}");
    }

    let mut page = view.lock().await;
    if view.is_closed() {
        debug!(view = %view.id(), "view closed, dropping staff response");
        return SubmitOutcome::ViewClosed;
    }
    let settlement = page.settle(ticket, outcome);
    if let Some(last) = page.transcript().last() {
        events.publish(view.id(), ViewEventKind::MessageAppended { sender: last.sender, text: last.text.clone() });
    }
    events.publish(view.id(), ViewEventKind::Loading { loading: page.is_loading() });
    settlement.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edupanel_common::{chat::NO_REPLY_TEXT, PanelError};

    #[test]
    fn test_reply_is_appended() {
        let mut page = StaffPage::new();
        let pending = page.begin_submit("How many leave days?").unwrap();
        assert!(page.is_loading());

        let reply = StaffReply { reply: Some("Twenty.".to_string()) };
        page.settle(pending.ticket, Ok(reply));
        assert_eq!(
            page.transcript(),
            &[ChatMessage::user("How many leave days?"), ChatMessage::bot("Twenty.")]
        );
        assert!(!page.is_loading());
    }

    #[test]
    fn test_missing_reply_uses_placeholder() {
        let mut page = StaffPage::new();
        let pending = page.begin_submit("hi").unwrap();
        page.settle(pending.ticket, Ok(StaffReply::default()));
        assert_eq!(page.transcript()[1].text, NO_REPLY_TEXT);
    }

    #[test]
    fn test_failure_appends_fallback_message() {
        let mut page = StaffPage::new();
        let pending = page.begin_submit("hi").unwrap();
        page.settle(pending.ticket, Err(PanelError::Status { status: 500 }));

        assert_eq!(page.transcript().len(), 2);
        assert_eq!(page.transcript()[1], ChatMessage::bot(FALLBACK_REPLY_TEXT));
        assert!(!page.is_loading());
    }

    #[test]
    fn test_submit_disabled_while_loading() {
        let mut page = StaffPage::new();
        let first = page.begin_submit("one").unwrap();
        assert!(page.begin_submit("two").is_none());
        assert_eq!(page.transcript().len(), 1);
        assert_eq!(page.input(), "two");

        page.settle(first.ticket, Ok(StaffReply::default()));
        let second = page.begin_submit("two").unwrap();
        assert_eq!(second.message, "two");
        assert_eq!(page.input(), "");
    }

    #[test]
    fn test_whitespace_only_is_ignored() {
        let mut page = StaffPage::new();
        assert!(page.begin_submit("\n  ").is_none());
        assert!(page.transcript().is_empty());
        assert!(!page.is_loading());
    }
}
