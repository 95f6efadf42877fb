//! Task status as reported by the status endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an asynchronous extraction task
///
/// `Error` is never sent by the server; it is synthesized locally when the
/// status request itself fails. Anything the server sends that isn't one of
/// the known values is kept as `Unrecognized` and treated as terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Started,
    Success,
    Failure,
    Error,
    Unrecognized(String),
}

impl TaskStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending | TaskStatus::Started)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Started => "STARTED",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
            TaskStatus::Error => "ERROR",
            TaskStatus::Unrecognized(other) => other,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => TaskStatus::Pending,
            "STARTED" => TaskStatus::Started,
            "SUCCESS" => TaskStatus::Success,
            "FAILURE" => TaskStatus::Failure,
            "ERROR" => TaskStatus::Error,
            _ => TaskStatus::Unrecognized(value),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        TaskStatus::from(value.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One response from the status endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskStatusReport {
    pub status: TaskStatus,

    /// Present when the task succeeded
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl TaskStatusReport {
    /// Local stand-in used when the status request could not be completed
    pub fn transport_error() -> Self {
        Self {
            status: TaskStatus::Error,
            result: None,
        }
    }
}
