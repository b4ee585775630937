//! Completion result retrieval.
//!
//! [`ResultFetcher`] walks workflow history newest-first, one page at a
//! time, until it sees the WorkflowExecutionCompleted event and returns
//! the payload that event carries.

use std::sync::Arc;

use tracing::debug;

use millrace_api::{EventAttributes, EventType, GetWorkflowExecutionHistoryRequest};
use millrace_core::{
    EncodedValue, ExecutionHandle, MillraceError, MillraceResult, ResultNotFoundError,
};

use crate::client::WorkflowClient;

/// Default page size when walking history
pub const DEFAULT_PAGE_SIZE: i32 = 1000;

/// Fetches the completion payload of a closed execution
pub struct ResultFetcher {
    client: Arc<WorkflowClient>,
    page_size: i32,
}

impl ResultFetcher {
    pub fn new(client: Arc<WorkflowClient>) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(client: Arc<WorkflowClient>, page_size: i32) -> Self {
        Self { client, page_size }
    }

    /// Return the payload recorded by the completion event.
    ///
    /// History is requested in reverse order, so for a completed execution
    /// the completion event sits at the front and no further pages are
    /// requested once it is seen. An execution whose entire history holds
    /// no completion event yields [`MillraceError::ResultNotFound`].
    pub async fn fetch_result(&self, execution: &ExecutionHandle) -> MillraceResult<EncodedValue> {
        let mut next_page_token: Option<String> = None;

        loop {
            let request = GetWorkflowExecutionHistoryRequest {
                domain: self.client.domain.clone(),
                execution: Some(execution.clone()),
                maximum_page_size: self.page_size,
                next_page_token: next_page_token.clone(),
                reverse_order: true,
            };

            let response = self
                .client
                .service
                .get_workflow_execution_history(request)
                .await
                .map_err(|e| MillraceError::ClientError(e.to_string()))?;

            let events = response.history.map(|h| h.events).unwrap_or_default();
            for event in events {
                if event.event_type != EventType::WorkflowExecutionCompleted {
                    continue;
                }

                let result = match event.attributes {
                    Some(EventAttributes::WorkflowExecutionCompletedEventAttributes(attrs)) => {
                        attrs.result
                    }
                    _ => None,
                };
                debug!(
                    workflow_id = %execution.workflow_id,
                    run_id = %execution.run_id,
                    event_id = event.event_id,
                    "found completion event"
                );
                return Ok(EncodedValue::new(result.unwrap_or_default()));
            }

            match response.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        Err(ResultNotFoundError::new(
            execution.workflow_id.clone(),
            execution.run_id.clone(),
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use millrace_core::is_result_not_found;
    use millrace_testsuite::{completion_event, lifecycle_event, TestOrchestrationService};

    fn fetcher_for(service: Arc<TestOrchestrationService>) -> ResultFetcher {
        let client = Arc::new(WorkflowClient::new(
            service,
            "test-domain".to_string(),
            ClientOptions::default(),
        ));
        ResultFetcher::new(client)
    }

    fn handle(service: &TestOrchestrationService) -> ExecutionHandle {
        ExecutionHandle::new("wf-result", service.run_id())
    }

    #[tokio::test]
    async fn test_returns_payload_from_completion_event() {
        let service = Arc::new(TestOrchestrationService::new());
        service.push_history_page(vec![
            completion_event(5, Some(b"\"done\"".to_vec())),
            lifecycle_event(4, EventType::DecisionTaskCompleted),
            lifecycle_event(1, EventType::WorkflowExecutionStarted),
        ]);
        let execution = handle(&service);

        let value = fetcher_for(service.clone())
            .fetch_result(&execution)
            .await
            .unwrap();

        assert_eq!(value.as_bytes(), b"\"done\"");
        let decoded: String = value.decode().unwrap();
        assert_eq!(decoded, "done");
        assert_eq!(service.history_request_count(), 1);
    }

    #[tokio::test]
    async fn test_stops_paging_once_completion_event_is_found() {
        let service = Arc::new(TestOrchestrationService::new());
        // Three pages of reverse-order history; the completion event sits
        // on the second, so the third page must never be requested.
        service.push_history_page(vec![
            lifecycle_event(9, EventType::DecisionTaskCompleted),
            lifecycle_event(8, EventType::DecisionTaskStarted),
        ]);
        service.push_history_page(vec![
            completion_event(7, Some(b"{\"ok\":true}".to_vec())),
            lifecycle_event(6, EventType::DecisionTaskScheduled),
        ]);
        service.push_history_page(vec![
            lifecycle_event(1, EventType::WorkflowExecutionStarted),
        ]);
        let execution = handle(&service);

        let value = fetcher_for(service.clone())
            .fetch_result(&execution)
            .await
            .unwrap();

        assert_eq!(value.as_bytes(), b"{\"ok\":true}");
        assert_eq!(service.history_request_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_completion_event_is_result_not_found() {
        let service = Arc::new(TestOrchestrationService::new());
        service.push_history_page(vec![
            lifecycle_event(3, EventType::DecisionTaskStarted),
            lifecycle_event(2, EventType::DecisionTaskScheduled),
        ]);
        service.push_history_page(vec![
            lifecycle_event(1, EventType::WorkflowExecutionStarted),
        ]);
        let execution = handle(&service);

        let err = fetcher_for(service.clone())
            .fetch_result(&execution)
            .await
            .unwrap_err();

        assert!(is_result_not_found(&err));
        // Both pages were exhausted before giving up
        assert_eq!(service.history_request_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_history_is_result_not_found() {
        let service = Arc::new(TestOrchestrationService::new());
        let execution = handle(&service);

        let err = fetcher_for(service)
            .fetch_result(&execution)
            .await
            .unwrap_err();

        assert!(is_result_not_found(&err));
        assert!(err.to_string().contains("wf-result"));
    }

    #[tokio::test]
    async fn test_completion_without_payload_yields_empty_value() {
        let service = Arc::new(TestOrchestrationService::new());
        service.push_history_page(vec![completion_event(2, None)]);
        let execution = handle(&service);

        let value = fetcher_for(service)
            .fetch_result(&execution)
            .await
            .unwrap();

        assert!(value.is_empty());
    }
}
