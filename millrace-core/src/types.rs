//! Core types for the millrace client.
//!
//! This module defines the identifiers and status types used throughout
//! the client for workflow executions, plus the backoff policy that
//! governs status polling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifies one run of a workflow execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionHandle {
    /// The workflow ID (user-defined or system-generated)
    pub workflow_id: String,
    /// The run ID (unique for each run of a workflow)
    pub run_id: String,
}

impl ExecutionHandle {
    pub fn new(workflow_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
        }
    }
}

/// Coarse execution state as reported by the orchestration service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExecutionStatus {
    Open = 0,
    Closed = 1,
}

/// Terminal status carried by a closed execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum CloseStatus {
    Completed = 0,
    Failed = 1,
    Canceled = 2,
    Terminated = 3,
    ContinuedAsNew = 4,
    TimedOut = 5,
}

/// Backoff policy for status polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Delay before the second attempt
    pub base_interval: Duration,
    /// Growth factor between attempts (2.0 doubles the delay)
    pub backoff_coefficient: f64,
    /// Hard ceiling on the computed delay
    pub maximum_interval: Duration,
    /// Total number of status queries before giving up
    pub maximum_attempts: i32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(1000),
            backoff_coefficient: 2.0,
            maximum_interval: Duration::from_millis(5 * 60 * 1000),
            maximum_attempts: 1000,
        }
    }
}
