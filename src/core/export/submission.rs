//! Submission - send each request until the API accepts it
//!
//! The transport layer retries 429/502 a couple of times. When that budget
//! runs out the submitter waits out the rate limit and starts the whole
//! submission again with a fresh budget. Without `max_cooldowns` this
//! repeats for as long as the API keeps rate limiting.

use super::request::ExportRequest;
use crate::adapters::rawdata::RawDataApi;
use crate::config::SubmissionConfig;
use crate::core::pause::Pause;
use crate::domain::{ExporterError, RawDataError, Result, TaskId};
use std::sync::Arc;
use std::time::Duration;

/// Cooldown rounds allowed for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub cooldown: Duration,

    /// `None` means keep cooling down forever
    pub max_cooldowns: Option<u32>,
}

impl CooldownPolicy {
    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self {
            cooldown: config.cooldown(),
            max_cooldowns: config.max_cooldowns,
        }
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::from_config(&SubmissionConfig::default())
    }
}

/// Submits export requests one at a time
pub struct Submitter {
    api: Arc<dyn RawDataApi>,
    pause: Arc<dyn Pause>,
    policy: CooldownPolicy,
}

impl Submitter {
    pub fn new(api: Arc<dyn RawDataApi>, pause: Arc<dyn Pause>, policy: CooldownPolicy) -> Self {
        Self { api, pause, policy }
    }

    /// Submit one request and return its task id
    ///
    /// # Errors
    ///
    /// Everything except an exhausted transport retry budget propagates
    /// immediately. An exhausted budget only becomes an error when
    /// `max_cooldowns` is set and used up.
    pub async fn submit(&self, request: &ExportRequest) -> Result<TaskId> {
        let mut cooldowns = 0u32;

        loop {
            match self.api.create_snapshot(&request.body).await {
                Ok(task_id) => {
                    tracing::info!(
                        export = %request.label,
                        task_id = %task_id,
                        "Export request submitted"
                    );
                    return Ok(task_id);
                }
                Err(ExporterError::RawData(RawDataError::RetryBudgetExhausted {
                    attempts,
                    status,
                })) => {
                    if let Some(max) = self.policy.max_cooldowns {
                        if cooldowns >= max {
                            tracing::error!(
                                export = %request.label,
                                cooldowns = cooldowns,
                                "Rate limit persisted past the cooldown cap"
                            );
                            return Err(ExporterError::RateLimited { cooldowns });
                        }
                    }

                    cooldowns += 1;
                    tracing::warn!(
                        export = %request.label,
                        attempts = attempts,
                        status = status,
                        cooldown_secs = self.policy.cooldown.as_secs(),
                        round = cooldowns,
                        "Rate limit reached. Waiting before retrying"
                    );
                    self.pause.pause(self.policy.cooldown).await;
                }
                Err(e) => {
                    tracing::error!(
                        export = %request.label,
                        error = %e,
                        "Export request failed"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Submit every request in order, stopping at the first failure
    pub async fn submit_all(&self, requests: &[ExportRequest]) -> Result<Vec<TaskId>> {
        let mut task_ids = Vec::with_capacity(requests.len());
        for request in requests {
            task_ids.push(self.submit(request).await?);
        }
        Ok(task_ids)
    }
}
