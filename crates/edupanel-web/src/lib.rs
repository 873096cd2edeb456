//! edupanel-web — Web front end for the edupanel pages:
//!   - Generic chat (replies with cited sources)
//!   - Staff assistant chat
//!   - Yearly K-Means student performance analysis
//!
//! Every page forwards input to an external service and renders the reply;
//! nothing is computed here.

pub mod router;
pub mod handlers;
pub mod state;
pub mod sse;
pub mod events;
pub mod views;
pub mod pages;
pub mod report;
pub mod templates;
