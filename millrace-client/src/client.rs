//! Workflow execution client.
//!
//! The client owns no transport of its own; it talks to whatever
//! [`OrchestrationService`] implementation it is constructed with.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use millrace_api::{
    DescribeWorkflowExecutionRequest, OrchestrationService, StartWorkflowExecutionRequest,
    TaskList, WorkflowExecutionInfo, WorkflowType,
};
use millrace_core::{ExecutionHandle, MillraceError, MillraceResult};

/// Options for starting a workflow execution
#[derive(Debug, Clone)]
pub struct StartExecutionOptions {
    pub id: String,
    pub task_list: String,
    pub execution_start_to_close_timeout: Option<Duration>,
    pub task_start_to_close_timeout: Option<Duration>,
    pub tag_list: Option<Vec<String>>,
}

impl Default for StartExecutionOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            task_list: String::new(),
            execution_start_to_close_timeout: None,
            task_start_to_close_timeout: None,
            tag_list: None,
        }
    }
}

/// Client configuration options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Client identity string
    pub identity: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            identity: format!(
                "millrace-client@{}-pid-{}",
                std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
                std::process::id()
            ),
        }
    }
}

/// Client implementation
pub struct WorkflowClient {
    pub(crate) service: Arc<dyn OrchestrationService<Error = MillraceError> + Send + Sync>,
    pub(crate) domain: String,
    pub(crate) options: ClientOptions,
}

impl WorkflowClient {
    /// Create a new WorkflowClient from an existing service
    pub fn new(
        service: Arc<dyn OrchestrationService<Error = MillraceError> + Send + Sync>,
        domain: String,
        options: ClientOptions,
    ) -> Self {
        Self {
            service,
            domain,
            options,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn identity(&self) -> &str {
        &self.options.identity
    }

    /// Start a workflow execution and return its handle
    pub async fn start_execution(
        &self,
        options: StartExecutionOptions,
        workflow_type: &str,
        input: Option<&[u8]>,
    ) -> MillraceResult<ExecutionHandle> {
        let request_id = Uuid::new_v4().to_string();
        let workflow_id = options.id.clone();

        let request = StartWorkflowExecutionRequest {
            domain: self.domain.clone(),
            workflow_id: workflow_id.clone(),
            workflow_type: Some(WorkflowType {
                name: workflow_type.to_string(),
            }),
            task_list: Some(TaskList {
                name: options.task_list,
            }),
            input: input.map(|a| a.to_vec()),
            execution_start_to_close_timeout_seconds: options
                .execution_start_to_close_timeout
                .map(|d| d.as_secs() as i32),
            task_start_to_close_timeout_seconds: options
                .task_start_to_close_timeout
                .map(|d| d.as_secs() as i32),
            identity: self.options.identity.clone(),
            request_id,
            tag_list: options.tag_list,
        };

        let response = self
            .service
            .start_workflow_execution(request)
            .await
            .map_err(|e| MillraceError::ClientError(e.to_string()))?;

        Ok(ExecutionHandle::new(workflow_id, response.run_id))
    }

    /// Describe a workflow execution
    pub async fn describe_execution(
        &self,
        execution: &ExecutionHandle,
    ) -> MillraceResult<WorkflowExecutionInfo> {
        let request = DescribeWorkflowExecutionRequest {
            domain: self.domain.clone(),
            execution: Some(execution.clone()),
        };

        let response = self
            .service
            .describe_workflow_execution(request)
            .await
            .map_err(|e| MillraceError::ClientError(e.to_string()))?;

        response.execution_info.ok_or_else(|| {
            MillraceError::ClientError("describe response missing execution info".to_string())
        })
    }
}
