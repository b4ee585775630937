//! Error types for the millrace client.
//!
//! This module defines all error types that can occur when starting,
//! polling, and fetching results for workflow executions.

use thiserror::Error;

/// Error raised when a completed execution has no completion event in its
/// history. This is an invariant violation on the service side and is not
/// retriable.
#[derive(Debug, Clone, Error)]
#[error("workflow completion event not found for {workflow_id}/{run_id}")]
pub struct ResultNotFoundError {
    pub workflow_id: String,
    pub run_id: String,
}

impl ResultNotFoundError {
    pub fn new(workflow_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
        }
    }
}

/// Main error type for all client operations
#[derive(Debug, Error)]
pub enum MillraceError {
    #[error(transparent)]
    ResultNotFound(#[from] ResultNotFoundError),

    /// The status poll was canceled before the execution closed
    #[error("status polling canceled")]
    PollingCanceled,

    #[error("unknown execution: {workflow_id}/{run_id}")]
    UnknownExecution {
        workflow_id: String,
        run_id: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Client error: {0}")]
    ClientError(String),

    #[error("Other error: {0}")]
    Other(String),
}

pub type MillraceResult<T> = Result<T, MillraceError>;

/// Helper functions to check error types
pub fn is_result_not_found(err: &MillraceError) -> bool {
    matches!(err, MillraceError::ResultNotFound(_))
}

pub fn is_polling_canceled(err: &MillraceError) -> bool {
    matches!(err, MillraceError::PollingCanceled)
}

pub fn is_unknown_execution(err: &MillraceError) -> bool {
    matches!(err, MillraceError::UnknownExecution { .. })
}

pub fn is_transport_error(err: &MillraceError) -> bool {
    matches!(err, MillraceError::Transport(_))
}
