//! Yearly K-Means analysis page: a year goes in, a pre-computed report comes out.
//!
//! Error and result are independent: a failed request sets the error banner
//! and leaves the previously shown report in place underneath it.

use std::ops::RangeInclusive;
use std::sync::Arc;

use edupanel_client::AnalysisBackend;
use edupanel_common::{AnalysisReport, PanelError, Result};
use edupanel_config::{AnalysisConfig, OverlapPolicy};
use serde::Serialize;
use tracing::{debug, warn};

use super::{Settlement, SubmitGate, SubmitOutcome, Ticket};
use crate::events::{EventBus, ViewEventKind};
use crate::views::View;

#[derive(Debug)]
pub struct PendingAnalysis {
    pub ticket: Ticket,
    pub year: i32,
}

#[derive(Debug)]
pub struct AnalysisPage {
    year: i32,
    bounds: RangeInclusive<i32>,
    result: Option<AnalysisReport>,
    error: Option<String>,
    gate: SubmitGate,
}

#[derive(Debug, Serialize)]
pub struct AnalysisSnapshot<'a> {
    pub year: i32,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub result: Option<&'a AnalysisReport>,
}

impl AnalysisPage {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            year: config.default_year,
            bounds: config.min_year..=config.max_year,
            result: None,
            error: None,
            gate: SubmitGate::new(OverlapPolicy::RejectWhilePending),
        }
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn bounds(&self) -> &RangeInclusive<i32> { &self.bounds }
    pub fn result(&self) -> Option<&AnalysisReport> { self.result.as_ref() }
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    pub fn is_loading(&self) -> bool { self.gate.is_loading() }

    /// Start a request for the current year. Out-of-range years set the error
    /// and issue nothing; a submit while loading is ignored outright.
    pub fn begin_submit(&mut self) -> Option<PendingAnalysis> {
        if self.is_loading() {
            return None;
        }
        if let Err(e) = check_year(self.year, &self.bounds) {
            self.error = Some(e.to_string());
            return None;
        }
        let ticket = self.gate.try_begin()?;
        self.error = None;
        Some(PendingAnalysis { ticket, year: self.year })
    }

    /// Parse the raw form value, then submit.
    pub fn begin_submit_text(&mut self, raw: &str) -> Option<PendingAnalysis> {
        if self.is_loading() {
            return None;
        }
        match raw.trim().parse::<i32>() {
            Ok(year) => {
                self.year = year;
                self.begin_submit()
            }
            Err(_) => {
                self.error = Some(PanelError::InvalidInput("Year must be a number".into()).to_string());
                None
            }
        }
    }

    pub fn settle(&mut self, ticket: Ticket, outcome: Result<AnalysisReport>) -> Settlement {
        if !self.gate.finish(ticket) {
            return Settlement::Stale;
        }
        match outcome {
            Ok(report) => self.result = Some(report),
            Err(e) => self.error = Some(e.to_string()),
        }
        Settlement::Applied
    }

    pub fn snapshot(&self) -> AnalysisSnapshot<'_> {
        AnalysisSnapshot {
            year: self.year,
            loading: self.is_loading(),
            error: self.error(),
            result: self.result(),
        }
    }
}

fn check_year(year: i32, bounds: &RangeInclusive<i32>) -> Result<i32> {
    if bounds.contains(&year) {
        Ok(year)
    } else {
        Err(PanelError::InvalidInput(format!(
            "Year must be between {} and {}",
            bounds.start(),
            bounds.end()
        )))
    }
}

pub async fn run_submit(
    view: Arc<View<AnalysisPage>>,
    backend: Arc<dyn AnalysisBackend>,
    events: EventBus,
    raw_year: String,
) -> SubmitOutcome {
    let pending = {
        let mut page = view.lock().await;
        let pending = page.begin_submit_text(&raw_year);
        if pending.is_none() {
            if let Some(message) = page.error() {
                events.publish(view.id(), ViewEventKind::Error { message: message.to_string() });
            }
        }
        pending
    };
    let Some(PendingAnalysis { ticket, year }) = pending else {
        return SubmitOutcome::Ignored;
    };
    events.publish(view.id(), ViewEventKind::Loading { loading: true });

    let outcome = backend.yearly_kmeans(year).await;
    match &outcome {
        Ok(report) => debug!(
            view = %view.id(),
            year,
            under_performing = report.under_performing.len(),
            subjects = report.subject_analysis.len(),
            "analysis received"
        ),
        Err(e) => warn!(
            view = %view.id(),
            endpoint = backend.endpoint(),
            year,
            status = ?e.status(),
            "analysis request failed: {e}"
        ),
    }

    let mut page = view.lock().await;
    if view.is_closed() {
        debug!(view = %view.id(), "view closed, dropping analysis response");
        return SubmitOutcome::ViewClosed;
    }
    let event = match &outcome {
        Ok(_) => ViewEventKind::ReportReplaced,
        Err(e) => ViewEventKind::Error { message: e.to_string() },
    };
    let settlement = page.settle(ticket, outcome);
    if settlement == Settlement::Applied {
        events.publish(view.id(), event);
    }
    events.publish(view.id(), ViewEventKind::Loading { loading: page.is_loading() });
    settlement.into()
}
