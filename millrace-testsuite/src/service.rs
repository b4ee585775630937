//! In-memory orchestration service.
//!
//! Describe responses and history pages are scripted up front, and every
//! request is counted, so tests can assert exactly how the client talked
//! to the service. The demo binary uses the same service in place of a
//! real server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use millrace_api::{
    DescribeWorkflowExecutionRequest, DescribeWorkflowExecutionResponse, EventAttributes,
    EventType, GetWorkflowExecutionHistoryRequest, GetWorkflowExecutionHistoryResponse, History,
    HistoryEvent, OrchestrationService, StartWorkflowExecutionRequest,
    StartWorkflowExecutionResponse, TaskList, WorkflowExecutionCompletedEventAttributes,
    WorkflowExecutionInfo, WorkflowExecutionStartedEventAttributes, WorkflowType,
};
use millrace_core::{CloseStatus, ExecutionHandle, ExecutionStatus, MillraceError};

/// Scripted reply to a single describe call
#[derive(Debug, Clone)]
enum DescribeStep {
    Status(ExecutionStatus, Option<CloseStatus>),
    Error(String),
}

#[derive(Debug)]
struct ServiceState {
    run_id: String,
    workflow_type: Option<WorkflowType>,
    started: Vec<StartWorkflowExecutionRequest>,
    describe_script: VecDeque<DescribeStep>,
    // Repeated once the script runs out
    last_status: (ExecutionStatus, Option<CloseStatus>),
    pages: Vec<History>,
    start_count: usize,
    describe_count: usize,
    history_count: usize,
}

/// Scripted in-memory stand-in for the orchestration service
pub struct TestOrchestrationService {
    state: Mutex<ServiceState>,
}

impl TestOrchestrationService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServiceState {
                run_id: format!("test-run-{}", uuid::Uuid::new_v4()),
                workflow_type: None,
                started: Vec::new(),
                describe_script: VecDeque::new(),
                last_status: (ExecutionStatus::Open, None),
                pages: Vec::new(),
                start_count: 0,
                describe_count: 0,
                history_count: 0,
            }),
        }
    }

    /// An execution that reports OPEN `open_polls` times, then closes
    /// COMPLETED with `result` as the completion payload. History is the
    /// usual reverse-order shape: the completion event leads the first
    /// page, the start event ends the last.
    pub fn completes_after(open_polls: usize, result: Vec<u8>) -> Self {
        let service = Self::new();
        for _ in 0..open_polls {
            service.enqueue_status(ExecutionStatus::Open, None);
        }
        service.enqueue_status(ExecutionStatus::Closed, Some(CloseStatus::Completed));

        service.push_history_page(vec![
            completion_event(11, Some(result)),
            lifecycle_event(10, EventType::DecisionTaskCompleted),
            lifecycle_event(9, EventType::DecisionTaskStarted),
            lifecycle_event(8, EventType::DecisionTaskScheduled),
            lifecycle_event(7, EventType::ActivityTaskCompleted),
        ]);
        service.push_history_page(vec![
            lifecycle_event(6, EventType::ActivityTaskStarted),
            lifecycle_event(5, EventType::ActivityTaskScheduled),
            lifecycle_event(4, EventType::DecisionTaskCompleted),
            lifecycle_event(3, EventType::DecisionTaskStarted),
            lifecycle_event(2, EventType::DecisionTaskScheduled),
            started_event(1),
        ]);
        service
    }

    /// Queue a describe reply; once the queue empties the last queued
    /// status repeats forever
    pub fn enqueue_status(&self, status: ExecutionStatus, close_status: Option<CloseStatus>) {
        if let Ok(mut state) = self.state.lock() {
            state
                .describe_script
                .push_back(DescribeStep::Status(status, close_status));
        }
    }

    /// Queue a one-shot transport failure for the next describe call
    pub fn enqueue_describe_error(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state
                .describe_script
                .push_back(DescribeStep::Error(message.into()));
        }
    }

    /// Append one page of history; pages chain through generated tokens
    pub fn push_history_page(&self, events: Vec<HistoryEvent>) {
        if let Ok(mut state) = self.state.lock() {
            state.pages.push(History { events });
        }
    }

    pub fn run_id(&self) -> String {
        self.state
            .lock()
            .map(|s| s.run_id.clone())
            .unwrap_or_default()
    }

    pub fn start_count(&self) -> usize {
        self.state.lock().map(|s| s.start_count).unwrap_or(0)
    }

    pub fn describe_count(&self) -> usize {
        self.state.lock().map(|s| s.describe_count).unwrap_or(0)
    }

    pub fn history_request_count(&self) -> usize {
        self.state.lock().map(|s| s.history_count).unwrap_or(0)
    }

    /// Start requests received so far, oldest first
    pub fn started_requests(&self) -> Vec<StartWorkflowExecutionRequest> {
        self.state
            .lock()
            .map(|s| s.started.clone())
            .unwrap_or_default()
    }
}

impl Default for TestOrchestrationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrchestrationService for TestOrchestrationService {
    type Error = MillraceError;

    async fn start_workflow_execution(
        &self,
        request: StartWorkflowExecutionRequest,
    ) -> Result<StartWorkflowExecutionResponse, Self::Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| MillraceError::Other("test service state poisoned".to_string()))?;

        state.start_count += 1;
        state.workflow_type = request.workflow_type.clone();
        state.started.push(request);

        Ok(StartWorkflowExecutionResponse {
            run_id: state.run_id.clone(),
        })
    }

    async fn describe_workflow_execution(
        &self,
        request: DescribeWorkflowExecutionRequest,
    ) -> Result<DescribeWorkflowExecutionResponse, Self::Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| MillraceError::Other("test service state poisoned".to_string()))?;

        state.describe_count += 1;

        let (status, close_status) = match state.describe_script.pop_front() {
            Some(DescribeStep::Status(status, close_status)) => {
                state.last_status = (status, close_status);
                (status, close_status)
            }
            Some(DescribeStep::Error(message)) => {
                return Err(MillraceError::Transport(message));
            }
            None => state.last_status,
        };

        let execution = request.execution.unwrap_or_else(|| {
            ExecutionHandle::new("test-workflow", state.run_id.clone())
        });

        let now = chrono::Utc::now();
        let close_time = match status {
            ExecutionStatus::Closed => Some(now),
            ExecutionStatus::Open => None,
        };

        Ok(DescribeWorkflowExecutionResponse {
            execution_info: Some(WorkflowExecutionInfo {
                execution: Some(execution),
                workflow_type: state.workflow_type.clone(),
                start_time: Some(now),
                close_time,
                execution_status: status,
                close_status,
                cancel_requested: false,
            }),
            execution_configuration: None,
        })
    }

    async fn get_workflow_execution_history(
        &self,
        request: GetWorkflowExecutionHistoryRequest,
    ) -> Result<GetWorkflowExecutionHistoryResponse, Self::Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| MillraceError::Other("test service state poisoned".to_string()))?;

        state.history_count += 1;

        let page_index = match request.next_page_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| {
                    MillraceError::InvalidArgument(format!("bad page token: {}", token))
                })?,
        };

        let history = state.pages.get(page_index).cloned().unwrap_or(History {
            events: Vec::new(),
        });
        let next_page_token = if page_index + 1 < state.pages.len() {
            Some(format!("page-{}", page_index + 1))
        } else {
            None
        };

        Ok(GetWorkflowExecutionHistoryResponse {
            history: Some(history),
            next_page_token,
        })
    }
}

/// Build a bare lifecycle event; attribute payloads are omitted
pub fn lifecycle_event(event_id: i64, event_type: EventType) -> HistoryEvent {
    HistoryEvent {
        event_id,
        timestamp: chrono::Utc::now().timestamp_millis(),
        event_type,
        attributes: None,
    }
}

/// Build the terminal completion event carrying `result`
pub fn completion_event(event_id: i64, result: Option<Vec<u8>>) -> HistoryEvent {
    HistoryEvent {
        event_id,
        timestamp: chrono::Utc::now().timestamp_millis(),
        event_type: EventType::WorkflowExecutionCompleted,
        attributes: Some(EventAttributes::WorkflowExecutionCompletedEventAttributes(
            Box::new(WorkflowExecutionCompletedEventAttributes {
                result,
                decision_task_completed_event_id: event_id - 1,
            }),
        )),
    }
}

fn started_event(event_id: i64) -> HistoryEvent {
    HistoryEvent {
        event_id,
        timestamp: chrono::Utc::now().timestamp_millis(),
        event_type: EventType::WorkflowExecutionStarted,
        attributes: Some(EventAttributes::WorkflowExecutionStartedEventAttributes(
            Box::new(WorkflowExecutionStartedEventAttributes {
                workflow_type: Some(WorkflowType {
                    name: "TestWorkflow".to_string(),
                }),
                task_list: Some(TaskList::new("test-task-list")),
                input: None,
                execution_start_to_close_timeout_seconds: Some(3600),
                task_start_to_close_timeout_seconds: Some(30),
                identity: "millrace-testsuite".to_string(),
                tag_list: None,
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe_request(service: &TestOrchestrationService) -> DescribeWorkflowExecutionRequest {
        DescribeWorkflowExecutionRequest {
            domain: "test-domain".to_string(),
            execution: Some(ExecutionHandle::new("test-workflow", service.run_id())),
        }
    }

    #[tokio::test]
    async fn test_scripted_describe_sequence_repeats_last() {
        let service = TestOrchestrationService::new();
        service.enqueue_status(ExecutionStatus::Open, None);
        service.enqueue_status(ExecutionStatus::Closed, Some(CloseStatus::Completed));

        let first = service
            .describe_workflow_execution(describe_request(&service))
            .await
            .unwrap();
        let info = first.execution_info.unwrap();
        assert_eq!(info.execution_status, ExecutionStatus::Open);
        assert_eq!(info.close_status, None);

        for _ in 0..2 {
            let response = service
                .describe_workflow_execution(describe_request(&service))
                .await
                .unwrap();
            let info = response.execution_info.unwrap();
            assert_eq!(info.execution_status, ExecutionStatus::Closed);
            assert_eq!(info.close_status, Some(CloseStatus::Completed));
        }

        assert_eq!(service.describe_count(), 3);
    }

    #[tokio::test]
    async fn test_history_pages_chain_through_tokens() {
        let service = TestOrchestrationService::new();
        service.push_history_page(vec![lifecycle_event(2, EventType::DecisionTaskScheduled)]);
        service.push_history_page(vec![lifecycle_event(1, EventType::WorkflowExecutionStarted)]);

        let first = service
            .get_workflow_execution_history(GetWorkflowExecutionHistoryRequest {
                domain: "test-domain".to_string(),
                execution: Some(ExecutionHandle::new("test-workflow", service.run_id())),
                maximum_page_size: 1000,
                next_page_token: None,
                reverse_order: true,
            })
            .await
            .unwrap();
        assert_eq!(first.history.unwrap().events.len(), 1);
        assert_eq!(first.next_page_token.as_deref(), Some("page-1"));

        let second = service
            .get_workflow_execution_history(GetWorkflowExecutionHistoryRequest {
                domain: "test-domain".to_string(),
                execution: Some(ExecutionHandle::new("test-workflow", service.run_id())),
                maximum_page_size: 1000,
                next_page_token: first.next_page_token,
                reverse_order: true,
            })
            .await
            .unwrap();
        assert_eq!(second.history.unwrap().events[0].event_id, 1);
        assert_eq!(second.next_page_token, None);
        assert_eq!(service.history_request_count(), 2);
    }

    #[tokio::test]
    async fn test_start_records_request() {
        let service = TestOrchestrationService::new();

        let response = service
            .start_workflow_execution(StartWorkflowExecutionRequest {
                domain: "test-domain".to_string(),
                workflow_id: "wf-1".to_string(),
                workflow_type: Some(WorkflowType {
                    name: "TestWorkflow".to_string(),
                }),
                task_list: Some(TaskList::new("test-task-list")),
                input: Some(b"\"World\"".to_vec()),
                execution_start_to_close_timeout_seconds: Some(3600),
                task_start_to_close_timeout_seconds: Some(30),
                identity: "test".to_string(),
                request_id: "req-1".to_string(),
                tag_list: None,
            })
            .await
            .unwrap();

        assert_eq!(response.run_id, service.run_id());
        assert_eq!(service.start_count(), 1);
        assert_eq!(service.started_requests()[0].workflow_id, "wf-1");
    }

    #[tokio::test]
    async fn test_describe_error_is_one_shot() {
        let service = TestOrchestrationService::new();
        service.enqueue_describe_error("connection reset");

        let err = service
            .describe_workflow_execution(describe_request(&service))
            .await
            .unwrap_err();
        assert!(matches!(err, MillraceError::Transport(_)));

        let response = service
            .describe_workflow_execution(describe_request(&service))
            .await
            .unwrap();
        assert_eq!(
            response.execution_info.unwrap().execution_status,
            ExecutionStatus::Open
        );
    }
}
