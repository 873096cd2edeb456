//! edupanel-common — Shared wire types and errors used across all edupanel crates.

pub mod error;
pub mod chat;
pub mod analysis;
mod ordered;

// Re-export commonly used types
pub use error::{PanelError, Result};
pub use chat::{ChatMessage, ChatReply, ChatRequest, Sender, StaffReply};
pub use analysis::{
    AnalysisMetadata, AnalysisReport, AnalysisRequest, CriticalStudent, ModelMetrics,
    SubjectAnalysis,
};
