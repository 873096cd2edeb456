//! Shared application state for the web server.

use std::sync::Arc;

use edupanel_client::{
    AnalysisBackend, ChatBackend, HttpAnalysisBackend, HttpChatBackend, HttpStaffBackend,
    StaffBackend,
};
use edupanel_config::{BackendsConfig, Config};

use crate::events::EventBus;
use crate::pages::{analysis::AnalysisPage, chat::ChatPage, staff::StaffPage};
use crate::templates::Templates;
use crate::views::ViewRegistry;

/// The three external services, one per page.
#[derive(Clone)]
pub struct Backends {
    pub chat: Arc<dyn ChatBackend>,
    pub staff: Arc<dyn StaffBackend>,
    pub analysis: Arc<dyn AnalysisBackend>,
}

impl Backends {
    /// HTTP backends sharing one connection pool.
    pub fn http(config: &BackendsConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            chat: Arc::new(HttpChatBackend::with_client(client.clone(), &config.chat_base_url)),
            staff: Arc::new(HttpStaffBackend::with_client(client.clone(), &config.staff_base_url)),
            analysis: Arc::new(HttpAnalysisBackend::with_client(client, &config.analysis_base_url)),
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Config,
    pub templates: Templates,
    /// Broadcast channel for SSE push events
    pub events: EventBus,
    pub chat_views: ViewRegistry<ChatPage>,
    pub staff_views: ViewRegistry<StaffPage>,
    pub analysis_views: ViewRegistry<AnalysisPage>,
    pub chat_backend: Arc<dyn ChatBackend>,
    pub staff_backend: Arc<dyn StaffBackend>,
    pub analysis_backend: Arc<dyn AnalysisBackend>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backends = Backends::http(&config.backends);
        Self::with_backends(config, backends)
    }

    pub fn with_backends(config: Config, backends: Backends) -> anyhow::Result<Self> {
        let capacity = config.server.max_views_per_page;
        Ok(Self {
            templates: Templates::new()?,
            events: EventBus::new(256),
            chat_views: ViewRegistry::new("chat", capacity),
            staff_views: ViewRegistry::new("staff", capacity),
            analysis_views: ViewRegistry::new("analysis", capacity),
            chat_backend: backends.chat,
            staff_backend: backends.staff,
            analysis_backend: backends.analysis,
            config,
        })
    }
}

pub type SharedState = Arc<AppState>;
