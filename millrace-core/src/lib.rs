//! Core types and utilities for the millrace client.
//!
//! This crate provides the foundational types, error handling, and
//! serialization framework shared by the client, the service trait,
//! and the test tooling.

pub mod encoded;
pub mod error;
pub mod types;

pub use encoded::*;
pub use error::*;
pub use types::*;
