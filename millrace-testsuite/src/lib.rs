//! Testing utilities for the millrace client.
//!
//! This crate provides an in-memory orchestration service for exercising
//! the poller and result fetcher without a running server.

pub mod service;

pub use service::*;
