//! Export orchestrator - the whole pipeline
//!
//! Discovery → request building → submission → (optional) tracking →
//! result persistence, one step after another.

use super::discovery::Discovery;
use super::request::RequestBuilder;
use super::submission::{CooldownPolicy, Submitter};
use super::summary::{ExportSummary, TrackingReport};
use super::tracking::Tracker;
use crate::adapters::rawdata::{RawDataApi, RawDataClient, RetryPolicy};
use crate::config::{ExportTemplate, ExporterConfig};
use crate::core::pause::{Pause, TokioPause};
use crate::domain::{CountryCode, ExportDescriptor, Frequency, Result, TaskId};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// What a single run should do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportPlan {
    /// Countries requested explicitly
    pub countries: Vec<CountryCode>,

    /// Interval of scheduled exports to add, if any
    pub scheduled: Option<Frequency>,

    /// Poll every task to completion after submitting
    pub track: bool,
}

impl ExportPlan {
    pub fn countries(countries: Vec<CountryCode>) -> Self {
        Self {
            countries,
            ..Default::default()
        }
    }

    pub fn scheduled(frequency: Frequency) -> Self {
        Self {
            scheduled: Some(frequency),
            ..Default::default()
        }
    }

    pub fn with_tracking(mut self, track: bool) -> Self {
        self.track = track;
        self
    }
}

/// Export orchestrator
pub struct ExportOrchestrator {
    builder: RequestBuilder,
    discovery: Discovery,
    submitter: Submitter,
    tracker: Tracker,
    result_path: PathBuf,
}

impl ExportOrchestrator {
    /// Create an orchestrator talking to the real API
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any network activity, when
    /// the template can't be resolved or the client can't be built.
    pub fn from_config(config: &ExporterConfig) -> Result<Self> {
        let template = ExportTemplate::resolve(&config.template)?;
        let pause: Arc<dyn Pause> = Arc::new(TokioPause);
        let client = RawDataClient::new(
            &config.api,
            RetryPolicy::from_config(&config.submission),
            pause.clone(),
        )?;

        tracing::info!(base_url = %client.base_url(), "Raw Data API client ready");
        Ok(Self::with_api(config, template, Arc::new(client), pause))
    }

    /// Create an orchestrator around any API implementation
    pub fn with_api(
        config: &ExporterConfig,
        template: ExportTemplate,
        api: Arc<dyn RawDataApi>,
        pause: Arc<dyn Pause>,
    ) -> Self {
        Self {
            builder: RequestBuilder::new(template, config.template.merge_strategy),
            discovery: Discovery::new(api.clone(), config.discovery.max_attempts),
            submitter: Submitter::new(
                api.clone(),
                pause.clone(),
                CooldownPolicy::from_config(&config.submission),
            ),
            tracker: Tracker::new(api, pause, config.tracking.poll_interval()),
            result_path: PathBuf::from(&config.tracking.result_path),
        }
    }

    /// Override where the result document is written
    pub fn with_result_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_path = path.into();
        self
    }

    /// Discover, build and submit; returns the collected task ids
    pub async fn trigger(&self, plan: &ExportPlan) -> Result<Vec<TaskId>> {
        let descriptors = self
            .discovery
            .discover(&plan.countries, plan.scheduled.as_ref())
            .await?;
        self.submit_descriptors(&descriptors).await
    }

    async fn submit_descriptors(&self, descriptors: &[ExportDescriptor]) -> Result<Vec<TaskId>> {
        let requests = self.builder.build_all(descriptors)?;
        let task_ids = self.submitter.submit_all(&requests).await?;

        tracing::info!(
            count = task_ids.len(),
            task_ids = ?task_ids.iter().map(TaskId::as_str).collect::<Vec<_>>(),
            "All requests to Raw Data API have been sent"
        );
        Ok(task_ids)
    }

    /// Poll every task to completion and write the result document
    ///
    /// # Errors
    ///
    /// Polling itself never fails; only writing the document can.
    pub async fn track(&self, task_ids: &[TaskId]) -> Result<TrackingReport> {
        let results = self.tracker.track(task_ids).await;

        tracing::info!(
            count = results.len(),
            path = %self.result_path.display(),
            "Dumping task results"
        );
        results.write_to(&self.result_path)?;
        tracing::info!(path = %self.result_path.display(), "Done! Results written");

        Ok(TrackingReport {
            results,
            result_path: self.result_path.clone(),
        })
    }

    /// Run the whole pipeline for a plan
    pub async fn run(&self, plan: &ExportPlan) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        tracing::info!(
            countries = plan.countries.len(),
            scheduled = ?plan.scheduled.as_ref().map(Frequency::as_str),
            track = plan.track,
            "Starting export run"
        );

        let descriptors = self
            .discovery
            .discover(&plan.countries, plan.scheduled.as_ref())
            .await?;
        summary.total_exports = descriptors.len();

        summary.task_ids = self.submit_descriptors(&descriptors).await?;

        if plan.track {
            summary.tracking = Some(self.track(&summary.task_ids).await?);
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}
