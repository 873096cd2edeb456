//! State-change events published per view and streamed to clients over SSE.

use edupanel_common::Sender;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::views::ViewId;

#[derive(Debug, Clone, Serialize)]
pub struct ViewEvent {
    pub view_id: ViewId,
    #[serde(flatten)]
    pub kind: ViewEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEventKind {
    Loading { loading: bool },
    MessageAppended { sender: Sender, text: String },
    /// Generic chat failure, shown as a blocking alert
    Alert { message: String },
    ReportReplaced,
    Error { message: String },
    Closed,
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ViewEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, view_id: ViewId, kind: ViewEventKind) {
        // No subscribers is the common case.
        let _ = self.tx.send(ViewEvent { view_id, kind });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.tx.subscribe()
    }
}
