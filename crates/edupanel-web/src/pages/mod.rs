//! Page components. Each page owns its input, result and error state and
//! performs exactly one kind of backend call.
//!
//! A submit is split in two: `begin_submit` takes the submitted text, mutates
//! state synchronously and returns a pending request, `settle` applies the
//! backend outcome. The
//! `run_submit` driver of each page connects the two across the single
//! suspension point, never holding the page lock while the backend runs.

pub mod gate;
pub mod chat;
pub mod staff;
pub mod analysis;

use serde::Serialize;
use std::future::Future;
use tracing::error;

pub use gate::{SubmitGate, Ticket};

/// What a settling response did to page state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// A newer request was issued; this response was dropped.
    Stale,
}

/// Result of one submit, as seen by the handler that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Empty input, invalid input or a request already pending.
    Ignored,
    Applied,
    Stale,
    /// The view was closed before the response arrived.
    ViewClosed,
}

impl From<Settlement> for SubmitOutcome {
    fn from(s: Settlement) -> Self {
        match s {
            Settlement::Applied => Self::Applied,
            Settlement::Stale => Self::Stale,
        }
    }
}

/// Run a submit driver on its own task so a dropped HTTP connection cannot
/// cancel it halfway and leave the page loading forever.
pub async fn spawn_submit<F>(driver: F) -> SubmitOutcome
where
    F: Future<Output = SubmitOutcome> + Send + 'static,
{
    match tokio::spawn(driver).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("submit task failed: {e}");
            SubmitOutcome::Ignored
        }
    }
}

/// Shared first half of both chat submits, run under one page lock: reject
/// blank text, take a ticket, and clear the input field. Text refused by the
/// gate stays in the field so the re-rendered form still shows it.
fn accept_input(input: &mut String, text: String, gate: &mut SubmitGate) -> Option<(Ticket, String)> {
    if text.trim().is_empty() {
        return None;
    }
    match gate.try_begin() {
        Some(ticket) => {
            input.clear();
            Some((ticket, text))
        }
        None => {
            *input = text;
            None
        }
    }
}
