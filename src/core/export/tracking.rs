//! Tracking - poll each task until it reaches a terminal status
//!
//! Tasks are polled strictly one after another; a slow task holds up the
//! ones behind it. Tracking never fails: a task whose status can't be
//! fetched is recorded as a failure and the next task is polled.

use crate::adapters::rawdata::RawDataApi;
use crate::core::pause::Pause;
use crate::domain::{ResultSet, TaskId, TaskOutcome, TaskStatus, TaskStatusReport};
use std::sync::Arc;
use std::time::Duration;

/// Polls task statuses and collects outcomes
pub struct Tracker {
    api: Arc<dyn RawDataApi>,
    pause: Arc<dyn Pause>,
    poll_interval: Duration,
}

impl Tracker {
    pub fn new(api: Arc<dyn RawDataApi>, pause: Arc<dyn Pause>, poll_interval: Duration) -> Self {
        Self {
            api,
            pause,
            poll_interval,
        }
    }

    /// Poll every task to completion
    pub async fn track(&self, task_ids: &[TaskId]) -> ResultSet {
        let mut results = ResultSet::new();

        for task_id in task_ids {
            let outcome = self.await_terminal(task_id).await;
            results.insert(task_id.clone(), outcome);
        }

        tracing::info!(
            count = results.len(),
            succeeded = results.succeeded(),
            failed = results.failed(),
            "Task statuses fetched"
        );
        results
    }

    /// Poll one task until its status is terminal
    pub async fn await_terminal(&self, task_id: &TaskId) -> TaskOutcome {
        loop {
            let report = self.fetch_status(task_id).await;

            if !report.status.is_terminal() {
                tracing::warn!(
                    task_id = %task_id,
                    status = %report.status,
                    retry_in_secs = self.poll_interval.as_secs(),
                    "Task not finished, polling again"
                );
                self.pause.pause(self.poll_interval).await;
                continue;
            }

            if report.status == TaskStatus::Success && report.result.is_none() {
                tracing::warn!(task_id = %task_id, "Task succeeded without a result payload");
            }

            tracing::info!(
                task_id = %task_id,
                status = %report.status,
                "Task finished, moving to the next one"
            );
            return TaskOutcome::from_report(report);
        }
    }

    async fn fetch_status(&self, task_id: &TaskId) -> TaskStatusReport {
        match self.api.task_status(task_id).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(task_id = %task_id, error = %e, "Error in status request");
                TaskStatusReport::transport_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pause::RecordingPause;
    use crate::domain::{
        ExportDescriptor, ExporterError, Frequency, RawDataError, Result, TaskStatusReport,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted status responses, in order
    struct ScriptedStatuses {
        responses: Mutex<VecDeque<Result<TaskStatusReport>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedStatuses {
        fn new(responses: Vec<Result<TaskStatusReport>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RawDataApi for ScriptedStatuses {
        async fn create_snapshot(&self, _body: &str) -> Result<TaskId> {
            unreachable!("tracking never submits")
        }

        async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatusReport> {
            self.calls.lock().unwrap().push(task_id.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }

        async fn scheduled_exports(&self, _frequency: &Frequency) -> Result<Vec<ExportDescriptor>> {
            unreachable!("tracking never discovers")
        }

        fn base_url(&self) -> &str {
            "http://scripted"
        }
    }

    fn report(status: &str, result: Option<serde_json::Value>) -> Result<TaskStatusReport> {
        Ok(TaskStatusReport {
            status: TaskStatus::from(status),
            result,
        })
    }

    fn task(id: &str) -> TaskId {
        TaskId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_started_then_failure_records_failure_marker() {
        let api = Arc::new(ScriptedStatuses::new(vec![
            report("STARTED", None),
            report("FAILURE", Some(json!({"error": "overpass timeout"}))),
        ]));
        let pause = Arc::new(RecordingPause::new());
        let tracker = Tracker::new(api.clone(), pause.clone(), Duration::from_secs(30));

        let outcome = tracker.await_terminal(&task("t-1")).await;

        assert_eq!(outcome, TaskOutcome::Failure);
        assert_eq!(api.calls().len(), 2);
        assert_eq!(pause.waits(), vec![Duration::from_secs(30)]);
    }

    #[tokio::test]
    async fn test_transport_error_mid_polling_is_terminal() {
        let api = Arc::new(ScriptedStatuses::new(vec![
            report("PENDING", None),
            Err(ExporterError::RawData(RawDataError::Timeout(
                "operation timed out".to_string(),
            ))),
        ]));
        let pause = Arc::new(RecordingPause::new());
        let tracker = Tracker::new(api.clone(), pause, Duration::from_secs(30));

        let outcome = tracker.await_terminal(&task("t-1")).await;

        assert_eq!(outcome, TaskOutcome::Failure);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_tasks_are_polled_in_order() {
        let api = Arc::new(ScriptedStatuses::new(vec![
            report("PENDING", None),
            report("SUCCESS", Some(json!({"download_url": "a.zip"}))),
            report("SUCCESS", Some(json!({"download_url": "b.zip"}))),
        ]));
        let pause = Arc::new(RecordingPause::new());
        let tracker = Tracker::new(api.clone(), pause, Duration::from_secs(30));

        let results = tracker.track(&[task("a"), task("b")]).await;

        assert_eq!(api.calls(), vec!["a", "a", "b"]);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results.get(&task("b")),
            Some(&TaskOutcome::Success(json!({"download_url": "b.zip"})))
        );
    }

    #[tokio::test]
    async fn test_empty_task_list() {
        let api = Arc::new(ScriptedStatuses::new(vec![]));
        let tracker = Tracker::new(api, Arc::new(RecordingPause::new()), Duration::from_secs(30));
        assert!(tracker.track(&[]).await.is_empty());
    }
}
