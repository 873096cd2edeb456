use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Page view not found: {0}")]
    ViewNotFound(Uuid),
}

impl PanelError {
    /// HTTP status carried by the failure, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PanelError>;
