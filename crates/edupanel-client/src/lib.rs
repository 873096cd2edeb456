//! edupanel-client — Backend abstraction for the three external services.
//! Each page talks to exactly one backend trait; the HTTP implementations
//! POST JSON and decode the JSON reply.

pub mod backend;

pub use backend::{
    endpoint_url, AnalysisBackend, ChatBackend, HttpAnalysisBackend, HttpChatBackend,
    HttpStaffBackend, StaffBackend, ANALYSIS_PATH, CHAT_PATH,
};
