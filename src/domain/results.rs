//! Result set - task id to final outcome
//!
//! The result set is built up one task at a time while polling and written
//! once, as a single JSON document, when every task has reached a terminal
//! status.

use super::ids::TaskId;
use super::result::Result;
use super::status::{TaskStatus, TaskStatusReport};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::path::Path;

/// Literal recorded for every task that did not succeed
pub const FAILURE_MARKER: &str = "FAILURE";

/// Final outcome of a single task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// The task succeeded; holds the server's `result` payload
    Success(Value),

    /// The task failed, errored, or ended in a status we don't know
    Failure,
}

impl TaskOutcome {
    /// Map a terminal status report to an outcome
    ///
    /// A SUCCESS without a `result` field is recorded as `null`.
    pub fn from_report(report: TaskStatusReport) -> Self {
        match report.status {
            TaskStatus::Success => TaskOutcome::Success(report.result.unwrap_or(Value::Null)),
            _ => TaskOutcome::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }
}

impl Serialize for TaskOutcome {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TaskOutcome::Success(result) => result.serialize(serializer),
            TaskOutcome::Failure => serializer.serialize_str(FAILURE_MARKER),
        }
    }
}

/// Ordered mapping of task id to outcome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(TaskId, TaskOutcome)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a task, replacing any earlier outcome for it
    pub fn insert(&mut self, task_id: TaskId, outcome: TaskOutcome) {
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == task_id) {
            entry.1 = outcome;
        } else {
            self.entries.push((task_id, outcome));
        }
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&TaskOutcome> {
        self.entries
            .iter()
            .find(|(id, _)| id == task_id)
            .map(|(_, outcome)| outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &TaskOutcome)> {
        self.entries.iter().map(|(id, outcome)| (id, outcome))
    }

    /// Pretty-printed JSON document (2-space indentation)
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the whole set to `path`, replacing any existing file
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

impl Serialize for ResultSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (task_id, outcome) in &self.entries {
            map.serialize_entry(task_id.as_str(), outcome)?;
        }
        map.end()
    }
}
