//! Service interface for the workflow-orchestration collaborator.
//!
//! This crate defines the history-event model and the request/response
//! surface the client consumes. The orchestration service itself lives
//! elsewhere; everything here is the seam it is reached through.

pub mod history;
pub mod service;

pub use history::*;
pub use service::*;
