//! Backend traits and their reqwest implementations.
//!
//! Backends:
//!   HttpChatBackend     — generic chat service, POST /api/chat
//!   HttpStaffBackend    — staff assistant service, POST /api/chat
//!   HttpAnalysisBackend — yearly K-Means analysis, POST /api/analysis/yearly/kmeans
//!
//! No retry, no timeout: a failure is returned to the page as-is.

use async_trait::async_trait;
use edupanel_common::{
    AnalysisReport, AnalysisRequest, ChatReply, ChatRequest, PanelError, Result, StaffReply,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub const CHAT_PATH: &str = "/api/chat";
pub const ANALYSIS_PATH: &str = "/api/analysis/yearly/kmeans";

// ── Traits ────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, message: &str) -> Result<ChatReply>;
    fn endpoint(&self) -> &str;
}

#[async_trait]
pub trait StaffBackend: Send + Sync {
    async fn ask_staff(&self, message: &str) -> Result<StaffReply>;
    fn endpoint(&self) -> &str;
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn yearly_kmeans(&self, year: i32) -> Result<AnalysisReport>;
    fn endpoint(&self) -> &str;
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Join a configured base URL and a fixed endpoint path.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// POST `body` as JSON. Any non-2xx status is an error; the body is only
/// decoded on success.
async fn post_json<B, R>(client: &reqwest::Client, url: &str, body: &B) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let resp = client.post(url).json(body).send().await?;
    let status = resp.status();
    if !status.is_success() {
        debug!(%url, status = status.as_u16(), "backend answered with error status");
        return Err(PanelError::Status { status: status.as_u16() });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

// ── 1. Generic chat ───────────────────────────────────────────────────────────

pub struct HttpChatBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { url: endpoint_url(base_url, CHAT_PATH), client }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_chat(&self, message: &str) -> Result<ChatReply> {
        debug!(url = %self.url, chars = message.len(), "sending chat message");
        let body = ChatRequest { message: message.to_string() };
        post_json(&self.client, &self.url, &body).await
    }

    fn endpoint(&self) -> &str { &self.url }
}

// ── 2. Staff assistant ────────────────────────────────────────────────────────

pub struct HttpStaffBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpStaffBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { url: endpoint_url(base_url, CHAT_PATH), client }
    }
}

#[async_trait]
impl StaffBackend for HttpStaffBackend {
    async fn ask_staff(&self, message: &str) -> Result<StaffReply> {
        debug!(url = %self.url, chars = message.len(), "sending staff question");
        let body = ChatRequest { message: message.to_string() };
        post_json(&self.client, &self.url, &body).await
    }

    fn endpoint(&self) -> &str { &self.url }
}

// ── 3. Yearly analysis ────────────────────────────────────────────────────────

pub struct HttpAnalysisBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpAnalysisBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { url: endpoint_url(base_url, ANALYSIS_PATH), client }
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn yearly_kmeans(&self, year: i32) -> Result<AnalysisReport> {
        debug!(url = %self.url, year, "requesting yearly analysis");
        post_json(&self.client, &self.url, &AnalysisRequest { year }).await
    }

    fn endpoint(&self) -> &str { &self.url }
}
