//! Client implementation for the millrace workflow orchestration service.
//!
//! This crate provides the client surface for starting workflow executions,
//! polling their status until they close, and fetching the completion result
//! from workflow history.

pub mod client;
pub mod config;
pub mod poller;
pub mod result;

pub use client::*;
pub use config::*;
pub use poller::*;
pub use result::*;
