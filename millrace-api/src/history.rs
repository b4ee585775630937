//! Execution history model.
//!
//! History is the service-side record of everything that happened to an
//! execution, delivered in pages. The result fetcher walks these events in
//! reverse chronological order looking for the single completion event.

use serde::{Deserialize, Serialize};

/// Workflow type information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowType {
    pub name: String,
}

/// Activity type information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub name: String,
}

/// Task list identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskList {
    pub name: String,
}

impl TaskList {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Represents a single event in workflow history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub event_id: i64,
    pub timestamp: i64,
    pub event_type: EventType,
    pub attributes: Option<EventAttributes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum EventType {
    WorkflowExecutionStarted = 0,
    WorkflowExecutionCompleted = 1,
    WorkflowExecutionFailed = 2,
    WorkflowExecutionTimedOut = 3,
    WorkflowExecutionCanceled = 4,
    WorkflowExecutionTerminated = 5,
    WorkflowExecutionContinuedAsNew = 6,
    DecisionTaskScheduled = 7,
    DecisionTaskStarted = 8,
    DecisionTaskCompleted = 9,
    ActivityTaskScheduled = 10,
    ActivityTaskStarted = 11,
    ActivityTaskCompleted = 12,
    ActivityTaskFailed = 13,
    ActivityTaskTimedOut = 14,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventAttributes {
    WorkflowExecutionStartedEventAttributes(Box<WorkflowExecutionStartedEventAttributes>),
    WorkflowExecutionCompletedEventAttributes(Box<WorkflowExecutionCompletedEventAttributes>),
    WorkflowExecutionFailedEventAttributes(Box<WorkflowExecutionFailedEventAttributes>),
    WorkflowExecutionTimedOutEventAttributes(Box<WorkflowExecutionTimedOutEventAttributes>),
    WorkflowExecutionCanceledEventAttributes(Box<WorkflowExecutionCanceledEventAttributes>),
    WorkflowExecutionTerminatedEventAttributes(Box<WorkflowExecutionTerminatedEventAttributes>),
    WorkflowExecutionContinuedAsNewEventAttributes(
        Box<WorkflowExecutionContinuedAsNewEventAttributes>,
    ),
    DecisionTaskScheduledEventAttributes(Box<DecisionTaskScheduledEventAttributes>),
    DecisionTaskStartedEventAttributes(Box<DecisionTaskStartedEventAttributes>),
    DecisionTaskCompletedEventAttributes(Box<DecisionTaskCompletedEventAttributes>),
    ActivityTaskScheduledEventAttributes(Box<ActivityTaskScheduledEventAttributes>),
    ActivityTaskStartedEventAttributes(Box<ActivityTaskStartedEventAttributes>),
    ActivityTaskCompletedEventAttributes(Box<ActivityTaskCompletedEventAttributes>),
    ActivityTaskFailedEventAttributes(Box<ActivityTaskFailedEventAttributes>),
    ActivityTaskTimedOutEventAttributes(Box<ActivityTaskTimedOutEventAttributes>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionStartedEventAttributes {
    pub workflow_type: Option<WorkflowType>,
    pub task_list: Option<TaskList>,
    pub input: Option<Vec<u8>>,
    pub execution_start_to_close_timeout_seconds: Option<i32>,
    pub task_start_to_close_timeout_seconds: Option<i32>,
    pub identity: String,
    pub tag_list: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionCompletedEventAttributes {
    pub result: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionFailedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionTimedOutEventAttributes {
    pub timeout_type: TimeoutType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionCanceledEventAttributes {
    pub details: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionTerminatedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionContinuedAsNewEventAttributes {
    pub new_execution_run_id: String,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskScheduledEventAttributes {
    pub task_list: Option<TaskList>,
    pub start_to_close_timeout_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskStartedEventAttributes {
    pub scheduled_event_id: i64,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskCompletedEventAttributes {
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskScheduledEventAttributes {
    pub activity_id: String,
    pub activity_type: Option<ActivityType>,
    pub input: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskStartedEventAttributes {
    pub scheduled_event_id: i64,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskCompletedEventAttributes {
    pub result: Option<Vec<u8>>,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskFailedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskTimedOutEventAttributes {
    pub timeout_type: TimeoutType,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum TimeoutType {
    StartToClose = 0,
    ScheduleToStart = 1,
    ScheduleToClose = 2,
    Heartbeat = 3,
}

/// One page worth of history events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub events: Vec<HistoryEvent>,
}
