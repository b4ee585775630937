//! Orchestration service interface.
//!
//! This module defines the request/response types for the three operations
//! the client consumes, and the [`OrchestrationService`] trait that stands
//! in for the real service. Implementations decide how requests travel;
//! the client only sees this seam.

use crate::history::{History, TaskList, WorkflowType};
use millrace_core::{CloseStatus, ExecutionHandle, ExecutionStatus};
use serde::{Deserialize, Serialize};

/// Start workflow execution request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartWorkflowExecutionRequest {
    pub domain: String,
    pub workflow_id: String,
    pub workflow_type: Option<WorkflowType>,
    pub task_list: Option<TaskList>,
    pub input: Option<Vec<u8>>,
    pub execution_start_to_close_timeout_seconds: Option<i32>,
    pub task_start_to_close_timeout_seconds: Option<i32>,
    pub identity: String,
    pub request_id: String,
    pub tag_list: Option<Vec<String>>,
}

/// Start workflow execution response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartWorkflowExecutionResponse {
    pub run_id: String,
}

/// Describe workflow execution request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeWorkflowExecutionRequest {
    pub domain: String,
    pub execution: Option<ExecutionHandle>,
}

/// Describe workflow execution response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeWorkflowExecutionResponse {
    pub execution_info: Option<WorkflowExecutionInfo>,
    pub execution_configuration: Option<WorkflowExecutionConfiguration>,
}

/// Current state of an execution as reported by describe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionInfo {
    pub execution: Option<ExecutionHandle>,
    pub workflow_type: Option<WorkflowType>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub close_time: Option<chrono::DateTime<chrono::Utc>>,
    pub execution_status: ExecutionStatus,
    /// Present once `execution_status` is `Closed`
    pub close_status: Option<CloseStatus>,
    pub cancel_requested: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionConfiguration {
    pub task_list: Option<TaskList>,
    pub execution_start_to_close_timeout_seconds: i32,
    pub task_start_to_close_timeout_seconds: i32,
}

/// Get workflow execution history request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetWorkflowExecutionHistoryRequest {
    pub domain: String,
    pub execution: Option<ExecutionHandle>,
    pub maximum_page_size: i32,
    pub next_page_token: Option<String>,
    /// When true, events are returned newest first
    pub reverse_order: bool,
}

/// Get workflow execution history response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetWorkflowExecutionHistoryResponse {
    pub history: Option<History>,
    pub next_page_token: Option<String>,
}

/// Orchestration service trait - defines the operations the client consumes
#[async_trait::async_trait]
pub trait OrchestrationService: Send + Sync {
    type Error: std::error::Error;

    async fn start_workflow_execution(
        &self,
        request: StartWorkflowExecutionRequest,
    ) -> Result<StartWorkflowExecutionResponse, Self::Error>;

    async fn describe_workflow_execution(
        &self,
        request: DescribeWorkflowExecutionRequest,
    ) -> Result<DescribeWorkflowExecutionResponse, Self::Error>;

    async fn get_workflow_execution_history(
        &self,
        request: GetWorkflowExecutionHistoryRequest,
    ) -> Result<GetWorkflowExecutionHistoryResponse, Self::Error>;
}
