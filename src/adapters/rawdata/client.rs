//! Raw Data API HTTP client
//!
//! Implements [`RawDataApi`] over reqwest. Snapshot submission carries its
//! own transport retry layer; status and discovery requests are sent once
//! and their callers decide what a failure means.

use super::api::RawDataApi;
use super::models::{FeatureCollection, SnapshotResponse};
use crate::config::{ApiConfig, SubmissionConfig};
use crate::core::pause::Pause;
use crate::domain::{
    ExportDescriptor, ExporterError, Frequency, RawDataError, Result, TaskId, TaskStatusReport,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

/// Header carrying the API access token
pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// Transport retry policy for snapshot submission
///
/// With the defaults a request is sent at most three times, retrying only
/// on 429 and 502.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Statuses that are retried
    pub status_codes: Vec<u16>,

    /// Backoff factor in seconds
    pub backoff_factor: f64,

    /// Cap for any single delay
    pub backoff_max: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            status_codes: config.retry_status_codes.clone(),
            backoff_factor: config.backoff_factor,
            backoff_max: Duration::from_secs(config.backoff_max_secs),
        }
    }

    pub fn should_retry(&self, status: StatusCode) -> bool {
        self.status_codes.contains(&status.as_u16())
    }

    /// Delay before retry number `retry` (1-based)
    ///
    /// The first retry is immediate; after that the delay is
    /// `backoff_factor * 2^(retry - 1)` seconds, capped at `backoff_max`.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exponent = (retry - 1).min(62) as i32;
        let secs = self.backoff_factor * 2f64.powi(exponent);
        Duration::from_secs_f64(secs.min(self.backoff_max.as_secs_f64()))
    }

    /// Delay before retry number `retry`, honoring `Retry-After` on 429
    fn delay_for(&self, retry: u32, status: StatusCode, headers: &HeaderMap) -> Duration {
        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(secs) = headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
            {
                return Duration::from_secs(secs).min(self.backoff_max);
            }
        }
        self.backoff(retry)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&SubmissionConfig::default())
    }
}

/// HTTP client for the Raw Data API
///
/// # Example
///
/// ```no_run
/// use hdx_exporter::adapters::rawdata::{RawDataApi, RawDataClient, RetryPolicy};
/// use hdx_exporter::config::ApiConfig;
/// use hdx_exporter::core::pause::TokioPause;
/// use hdx_exporter::domain::Frequency;
/// use secrecy::SecretString;
/// use std::sync::Arc;
///
/// # async fn example() -> hdx_exporter::domain::Result<()> {
/// let api = ApiConfig {
///     access_token: Some(SecretString::new("token".to_string())),
///     ..Default::default()
/// };
/// let client = RawDataClient::new(&api, RetryPolicy::default(), Arc::new(TokioPause))?;
/// let scheduled = client.scheduled_exports(&Frequency::default()).await?;
/// println!("{} scheduled exports", scheduled.len());
/// # Ok(())
/// # }
/// ```
pub struct RawDataClient {
    base_url: String,
    client: Client,
    access_token: HeaderValue,
    retry: RetryPolicy,
    pause: Arc<dyn Pause>,
}

impl RawDataClient {
    /// Create a client from the API configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the access token is missing or not
    /// a valid header value, or the HTTP client can't be built.
    pub fn new(config: &ApiConfig, retry: RetryPolicy, pause: Arc<dyn Pause>) -> Result<Self> {
        let token = config.access_token.as_ref().ok_or_else(|| {
            ExporterError::Configuration(
                "RAWDATA_API_AUTH_TOKEN environment variable not found".to_string(),
            )
        })?;

        let mut access_token = HeaderValue::from_str(token.expose_secret().trim()).map_err(|_| {
            ExporterError::Configuration(
                "Access token contains characters not allowed in an HTTP header".to_string(),
            )
        })?;
        access_token.set_sensitive(true);

        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| {
                ExporterError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.normalized_base_url().to_string(),
            client,
            access_token,
            retry,
            pause,
        })
    }

    pub fn snapshot_url(&self) -> String {
        format!("{}/custom/snapshot/", self.base_url)
    }

    pub fn status_url(&self, task_id: &TaskId) -> String {
        format!("{}/tasks/status/{}/", self.base_url, task_id)
    }

    pub fn scheduled_url(&self) -> String {
        format!("{}/hdx/queries/scheduled/", self.base_url)
    }
}

fn transport_error(e: reqwest::Error) -> ExporterError {
    if e.is_timeout() {
        RawDataError::Timeout(e.to_string()).into()
    } else {
        RawDataError::ConnectionFailed(e.to_string()).into()
    }
}

async fn unexpected_status(resp: reqwest::Response) -> ExporterError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    RawDataError::UnexpectedStatus { status, body }.into()
}

#[async_trait]
impl RawDataApi for RawDataClient {
    async fn create_snapshot(&self, body: &str) -> Result<TaskId> {
        let url = self.snapshot_url();
        let mut retries = 0u32;

        loop {
            let resp = self
                .client
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCESS_TOKEN_HEADER, self.access_token.clone())
                .body(body.to_owned())
                .send()
                .await
                .map_err(transport_error)?;

            let status = resp.status();

            if self.retry.should_retry(status) {
                if retries >= self.retry.max_retries {
                    return Err(RawDataError::RetryBudgetExhausted {
                        attempts: retries + 1,
                        status: status.as_u16(),
                    }
                    .into());
                }

                retries += 1;
                let delay = self.retry.delay_for(retries, status, resp.headers());
                tracing::warn!(
                    status = status.as_u16(),
                    retry = retries,
                    max_retries = self.retry.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Snapshot request not accepted, retrying"
                );
                self.pause.pause(delay).await;
                continue;
            }

            if !status.is_success() {
                return Err(unexpected_status(resp).await);
            }

            let payload: SnapshotResponse = resp.json().await.map_err(|e| {
                RawDataError::InvalidResponse(format!("Snapshot response without task_id: {e}"))
            })?;

            let task_id = TaskId::new(payload.task_id).map_err(RawDataError::InvalidResponse)?;
            tracing::debug!(
                task_id = %task_id,
                track_link = payload.track_link.as_deref().unwrap_or("-"),
                "Snapshot request accepted"
            );
            return Ok(task_id);
        }
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatusReport> {
        let url = self.status_url(task_id);
        tracing::debug!(url = %url, "Fetching task status");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(unexpected_status(resp).await);
        }

        resp.json::<TaskStatusReport>()
            .await
            .map_err(|e| RawDataError::InvalidResponse(e.to_string()).into())
    }

    async fn scheduled_exports(&self, frequency: &Frequency) -> Result<Vec<ExportDescriptor>> {
        let url = self.scheduled_url();
        tracing::debug!(url = %url, interval = %frequency, "Fetching scheduled exports");

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", frequency.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            return Err(unexpected_status(resp).await);
        }

        let collection: FeatureCollection = resp
            .json()
            .await
            .map_err(|e| RawDataError::InvalidResponse(e.to_string()))?;

        Ok(collection.features)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
