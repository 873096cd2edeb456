//! Submit drivers against fake backends whose replies are released by hand.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use edupanel_client::{ChatBackend, StaffBackend};
use edupanel_common::{ChatMessage, ChatReply, PanelError, Result, StaffReply};
use edupanel_config::OverlapPolicy;
use edupanel_web::events::{EventBus, ViewEventKind};
use edupanel_web::pages::{self, chat::ChatPage, staff::StaffPage, SubmitOutcome};
use edupanel_web::views::{View, ViewRegistry};
use tokio::sync::oneshot;

/// Each message blocks until its gate is released.
#[derive(Default)]
struct GatedChat {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<ChatReply>>>>,
}

impl GatedChat {
    fn gate(&self, message: &str) -> oneshot::Sender<Result<ChatReply>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(message.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ChatBackend for GatedChat {
    async fn send_chat(&self, message: &str) -> Result<ChatReply> {
        let rx = self.gates.lock().unwrap().remove(message);
        match rx {
            Some(rx) => rx.await.unwrap_or(Err(PanelError::InvalidInput("gate dropped".into()))),
            None => Ok(ChatReply { reply: Some(format!("re: {message}")), sources: None }),
        }
    }

    fn endpoint(&self) -> &str {
        "fake://chat"
    }
}

#[derive(Default)]
struct GatedStaff {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<StaffReply>>>>,
}

impl GatedStaff {
    fn gate(&self, message: &str) -> oneshot::Sender<Result<StaffReply>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(message.to_string(), rx);
        tx
    }
}

#[async_trait]
impl StaffBackend for GatedStaff {
    async fn ask_staff(&self, message: &str) -> Result<StaffReply> {
        let rx = self.gates.lock().unwrap().remove(message);
        match rx {
            Some(rx) => rx.await.unwrap_or(Err(PanelError::InvalidInput("gate dropped".into()))),
            None => Ok(StaffReply { reply: Some(format!("re: {message}")) }),
        }
    }

    fn endpoint(&self) -> &str {
        "fake://staff"
    }
}

fn reply(text: &str) -> Result<ChatReply> {
    Ok(ChatReply { reply: Some(text.to_string()), sources: None })
}

async fn wait_for<P, F>(view: &View<P>, cond: F)
where
    F: Fn(&P) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if cond(&*view.lock().await) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_chat_hello_hi_there() {
    let registry = ViewRegistry::new("chat", 4);
    let view = registry.open(ChatPage::new(OverlapPolicy::LatestWins)).await;
    let backend = Arc::new(GatedChat::default());
    let events = EventBus::new(16);
    let mut rx = events.subscribe();

    let release = backend.gate("hello");
    let task = tokio::spawn(pages::chat::run_submit(
        view.clone(),
        backend.clone(),
        events.clone(),
        "hello".into(),
    ));

    wait_for(&view, |p: &ChatPage| p.is_loading()).await;
    {
        let page = view.lock().await;
        assert_eq!(page.transcript(), &[ChatMessage::user("hello")]);
        assert_eq!(page.input(), "");
    }

    release.send(reply("hi there")).unwrap();
    assert_eq!(task.await.unwrap(), SubmitOutcome::Applied);

    let page = view.lock().await;
    assert_eq!(page.transcript(), &[ChatMessage::user("hello"), ChatMessage::bot("hi there")]);
    assert!(!page.is_loading());
    assert!(page.alert().is_none());

    let first = rx.recv().await.unwrap();
    assert_eq!(first.view_id, view.id());
    assert!(matches!(first.kind, ViewEventKind::MessageAppended { .. }));
}

#[tokio::test]
async fn test_latest_wins_discards_earlier_reply() {
    let registry = ViewRegistry::new("chat", 4);
    let view = registry.open(ChatPage::new(OverlapPolicy::LatestWins)).await;
    let backend = Arc::new(GatedChat::default());
    let events = EventBus::new(64);

    let release_first = backend.gate("first");
    let release_second = backend.gate("second");

    let first = tokio::spawn(pages::chat::run_submit(
        view.clone(),
        backend.clone(),
        events.clone(),
        "first".into(),
    ));
    wait_for(&view, |p: &ChatPage| p.transcript().len() == 1).await;

    let second = tokio::spawn(pages::chat::run_submit(
        view.clone(),
        backend.clone(),
        events.clone(),
        "second".into(),
    ));
    wait_for(&view, |p: &ChatPage| p.transcript().len() == 2).await;

    release_second.send(reply("answer two")).unwrap();
    assert_eq!(second.await.unwrap(), SubmitOutcome::Applied);
    // the first request is still out
    assert!(view.lock().await.is_loading());

    release_first.send(reply("answer one")).unwrap();
    assert_eq!(first.await.unwrap(), SubmitOutcome::Stale);

    let page = view.lock().await;
    assert_eq!(
        page.transcript(),
        &[
            ChatMessage::user("first"),
            ChatMessage::user("second"),
            ChatMessage::bot("answer two"),
        ]
    );
    assert!(!page.is_loading());
}

#[tokio::test]
async fn test_staff_rejects_submit_while_pending() {
    let registry = ViewRegistry::new("staff", 4);
    let view = registry.open(StaffPage::new()).await;
    let backend = Arc::new(GatedStaff::default());
    let events = EventBus::new(16);

    let release = backend.gate("leave policy?");
    let task = tokio::spawn(pages::staff::run_submit(
        view.clone(),
        backend.clone(),
        events.clone(),
        "leave policy?".into(),
    ));
    wait_for(&view, |p: &StaffPage| p.is_loading()).await;

    let outcome = pages::staff::run_submit(
        view.clone(),
        backend.clone(),
        events.clone(),
        "another".into(),
    ).await;
    assert_eq!(outcome, SubmitOutcome::Ignored);
    assert_eq!(view.lock().await.transcript().len(), 1);

    release.send(Ok(StaffReply { reply: None })).unwrap();
    assert_eq!(task.await.unwrap(), SubmitOutcome::Applied);

    let page = view.lock().await;
    assert_eq!(
        page.transcript(),
        &[ChatMessage::user("leave policy?"), ChatMessage::bot("No reply from AI.")]
    );
    assert!(!page.is_loading());
}

#[tokio::test]
async fn test_staff_failure_appends_fallback() {
    let registry = ViewRegistry::new("staff", 4);
    let view = registry.open(StaffPage::new()).await;
    let backend = Arc::new(GatedStaff::default());

    let release = backend.gate("hi");
    release.send(Err(PanelError::Status { status: 503 })).unwrap();
    let outcome = pages::staff::run_submit(
        view.clone(),
        backend,
        EventBus::new(16),
        "hi".into(),
    ).await;
    assert_eq!(outcome, SubmitOutcome::Applied);

    let page = view.lock().await;
    assert_eq!(
        page.transcript().last(),
        Some(&ChatMessage::bot("Something went wrong. Please try again."))
    );
}

#[tokio::test]
async fn test_closed_view_drops_late_reply() {
    let registry = ViewRegistry::new("chat", 4);
    let view = registry.open(ChatPage::new(OverlapPolicy::LatestWins)).await;
    let backend = Arc::new(GatedChat::default());
    let events = EventBus::new(16);

    let release = backend.gate("bye");
    let task = tokio::spawn(pages::chat::run_submit(
        view.clone(),
        backend.clone(),
        events.clone(),
        "bye".into(),
    ));
    wait_for(&view, |p: &ChatPage| p.is_loading()).await;

    assert!(registry.close(view.id()).await);
    release.send(reply("too late")).unwrap();
    assert_eq!(task.await.unwrap(), SubmitOutcome::ViewClosed);
    assert_eq!(view.lock().await.transcript(), &[ChatMessage::user("bye")]);
}

#[tokio::test]
async fn test_blank_chat_input_is_ignored() {
    let registry = ViewRegistry::new("chat", 4);
    let view = registry.open(ChatPage::new(OverlapPolicy::LatestWins)).await;
    let outcome = pages::spawn_submit(pages::chat::run_submit(
        view.clone(),
        Arc::new(GatedChat::default()),
        EventBus::new(16),
        "   ".into(),
    ))
    .await;
    assert_eq!(outcome, SubmitOutcome::Ignored);
    assert!(view.lock().await.transcript().is_empty());
}
