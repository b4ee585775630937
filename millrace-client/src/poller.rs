//! Execution status polling.
//!
//! [`ExecutionPoller`] repeatedly describes an execution until the service
//! reports it closed, sleeping with exponential backoff between attempts.
//! Polling ends at the first closed status, when the attempt budget runs
//! out, or when the attached cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use millrace_core::{
    BackoffPolicy, CloseStatus, ExecutionHandle, ExecutionStatus, MillraceError, MillraceResult,
};

use crate::client::WorkflowClient;

/// Terminal outcome of a polling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The execution closed; carries the close status the service reported
    Closed(CloseStatus),
    /// The attempt budget ran out while the execution was still open
    AttemptsExhausted { attempts: i32 },
}

impl PollOutcome {
    /// True only when the execution closed COMPLETED
    pub fn succeeded(&self) -> bool {
        matches!(self, PollOutcome::Closed(CloseStatus::Completed))
    }

    /// Close status, if the execution closed at all
    pub fn close_status(&self) -> Option<CloseStatus> {
        match self {
            PollOutcome::Closed(status) => Some(*status),
            PollOutcome::AttemptsExhausted { .. } => None,
        }
    }
}

/// Polls an execution until it closes or the attempt budget runs out
pub struct ExecutionPoller {
    client: Arc<WorkflowClient>,
    policy: BackoffPolicy,
    cancellation: CancellationToken,
}

impl ExecutionPoller {
    pub fn new(client: Arc<WorkflowClient>, policy: BackoffPolicy) -> Self {
        Self {
            client,
            policy,
            cancellation: CancellationToken::new(),
        }
    }

    /// Attach an externally owned token so callers can cancel a running poll
    pub fn with_cancellation(
        client: Arc<WorkflowClient>,
        policy: BackoffPolicy,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            client,
            policy,
            cancellation,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Describe `execution` until it closes.
    ///
    /// Every attempt is reported through tracing. Describe failures are
    /// treated as transient: they consume the attempt and the next one runs
    /// after the usual backoff. Cancellation surfaces as
    /// [`MillraceError::PollingCanceled`].
    pub async fn poll_until_complete(
        &self,
        execution: &ExecutionHandle,
    ) -> MillraceResult<PollOutcome> {
        for attempt in 1..=self.policy.maximum_attempts {
            if self.cancellation.is_cancelled() {
                return Err(MillraceError::PollingCanceled);
            }

            match self.client.describe_execution(execution).await {
                Ok(info) => match info.execution_status {
                    ExecutionStatus::Closed => {
                        let close_status = info.close_status.ok_or_else(|| {
                            MillraceError::ClientError(
                                "closed execution reported without a close status".to_string(),
                            )
                        })?;
                        info!(
                            workflow_id = %execution.workflow_id,
                            run_id = %execution.run_id,
                            attempt,
                            close_status = ?close_status,
                            "execution closed"
                        );
                        return Ok(PollOutcome::Closed(close_status));
                    }
                    ExecutionStatus::Open => {
                        debug!(
                            workflow_id = %execution.workflow_id,
                            attempt,
                            "execution still open"
                        );
                    }
                },
                Err(e) => {
                    warn!(
                        workflow_id = %execution.workflow_id,
                        attempt,
                        error = %e,
                        "describe failed, will retry"
                    );
                }
            }

            // No sleep after the final attempt
            if attempt < self.policy.maximum_attempts {
                let delay = backoff_delay(&self.policy, attempt);
                debug!(
                    delay_ms = delay.as_millis(),
                    attempt, "sleeping before next poll"
                );
                tokio::select! {
                    _ = self.cancellation.cancelled() => {
                        return Err(MillraceError::PollingCanceled);
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        Ok(PollOutcome::AttemptsExhausted {
            attempts: self.policy.maximum_attempts,
        })
    }
}

/// Calculate backoff duration for a poll attempt
pub fn backoff_delay(policy: &BackoffPolicy, attempt: i32) -> Duration {
    // Exponential backoff: base_interval * (backoff_coefficient ^ (attempt - 1))
    let backoff_millis =
        policy.base_interval.as_millis() as f64 * policy.backoff_coefficient.powi(attempt - 1);

    let backoff = Duration::from_millis(backoff_millis as u64);

    // Cap at maximum interval
    if backoff > policy.maximum_interval {
        debug!(
            max_interval_ms = policy.maximum_interval.as_millis(),
            "backoff capped at maximum"
        );
        policy.maximum_interval
    } else {
        backoff
    }
}
