//! Raw Data API trait definition
//!
//! The export pipeline only talks to the API through [`RawDataApi`], which
//! keeps the HTTP details in one place and lets tests substitute fakes.

use crate::domain::{ExportDescriptor, Frequency, Result, TaskId, TaskStatusReport};
use async_trait::async_trait;

/// Operations the export pipeline needs from the Raw Data API
#[async_trait]
pub trait RawDataApi: Send + Sync {
    /// Submit one snapshot request body and return the task id
    ///
    /// Retryable statuses are retried within the transport budget. When
    /// that budget runs out this returns
    /// [`RawDataError::RetryBudgetExhausted`](crate::domain::RawDataError::RetryBudgetExhausted)
    /// so the caller can decide whether to cool down and try again.
    ///
    /// # Errors
    ///
    /// Any other failure (transport, non-retryable status, missing
    /// `task_id`) is returned as is.
    async fn create_snapshot(&self, body: &str) -> Result<TaskId>;

    /// Fetch the current status of a task, once, without retrying
    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatusReport>;

    /// Fetch the scheduled exports for an interval, once, without retrying
    async fn scheduled_exports(&self, frequency: &Frequency) -> Result<Vec<ExportDescriptor>>;

    /// Base URL of the API
    fn base_url(&self) -> &str;
}
