//! Export summary and reporting

use crate::domain::{ResultSet, TaskId};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of the tracking stage
#[derive(Debug, Clone)]
pub struct TrackingReport {
    /// Final outcome per task
    pub results: ResultSet,

    /// Where the result document was written
    pub result_path: PathBuf,
}

impl TrackingReport {
    pub fn succeeded(&self) -> usize {
        self.results.succeeded()
    }

    pub fn failed(&self) -> usize {
        self.results.failed()
    }
}

/// Summary of one export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Number of export descriptors discovered
    pub total_exports: usize,

    /// Task ids collected, in submission order
    pub task_ids: Vec<TaskId>,

    /// Tracking outcome, when tracking was requested
    pub tracking: Option<TrackingReport>,

    /// Duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_exports: 0,
            task_ids: Vec::new(),
            tracking: None,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn submitted(&self) -> usize {
        self.task_ids.len()
    }

    /// True unless tracking ran and some task did not succeed
    pub fn is_successful(&self) -> bool {
        self.tracking
            .as_ref()
            .map(|report| report.failed() == 0)
            .unwrap_or(true)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            total_exports = self.total_exports,
            submitted = self.submitted(),
            duration_secs = self.duration.as_secs(),
            "Export run completed"
        );

        if let Some(report) = &self.tracking {
            tracing::info!(
                tracked = report.results.len(),
                succeeded = report.succeeded(),
                failed = report.failed(),
                result_path = %report.result_path.display(),
                "Tracking completed"
            );
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}
