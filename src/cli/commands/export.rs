//! Export command implementation
//!
//! This module implements the `export` command, which triggers Raw Data API
//! snapshot exports and optionally waits for them to finish.

use crate::config::{load_config_or_env, ExporterConfig};
use crate::core::export::{ExportOrchestrator, ExportPlan, ExportSummary};
use crate::domain::{CountryCode, ExporterError, Frequency, FAILURE_MARKER};
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the exports to trigger come from
#[derive(Args, Debug, Clone, PartialEq)]
#[group(required = true, multiple = false)]
pub struct ExportSource {
    /// ISO3 country codes to export
    #[arg(long, num_args = 1.., value_name = "ISO3")]
    pub countries: Option<Vec<String>>,

    /// Export every country scheduled at this interval (default from config)
    #[arg(long, num_args = 0..=1, value_name = "FREQUENCY")]
    pub fetch_scheduled_exports: Option<Option<String>>,

    /// JSON event file with `countries` and/or `fetch_scheduled_exports`
    #[arg(long, value_name = "FILE")]
    pub event: Option<PathBuf>,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: ExportSource,

    /// Poll every task until it finishes and write the result document
    #[arg(long)]
    pub track: bool,

    /// Override the result document path
    #[arg(long, value_name = "FILE")]
    pub result_path: Option<PathBuf>,
}

/// Invocation event, as accepted by `--event`
///
/// Both sources are additive. A `null` or empty `countries` adds nothing.
/// `fetch_scheduled_exports` defaults to `"daily"` when the key is absent
/// and is disabled by `null` or a blank string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportEvent {
    #[serde(default)]
    pub countries: Option<Vec<String>>,

    #[serde(default = "default_event_frequency")]
    pub fetch_scheduled_exports: Option<String>,
}

fn default_event_frequency() -> Option<String> {
    Some(Frequency::default().to_string())
}

impl ExportEvent {
    pub fn from_file(path: &Path) -> crate::domain::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExporterError::Configuration(format!(
                "Failed to read event file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ExporterError::Configuration(format!(
                "Invalid event file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl ExportArgs {
    /// Turn the arguments into a plan
    ///
    /// `default_frequency` is used when `--fetch-scheduled-exports` is given
    /// without a value.
    pub fn plan(&self, default_frequency: &str) -> crate::domain::Result<ExportPlan> {
        let plan = match &self.source {
            ExportSource {
                countries: Some(countries),
                ..
            } => ExportPlan::countries(parse_countries(countries)?),
            ExportSource {
                fetch_scheduled_exports: Some(frequency),
                ..
            } => {
                let frequency = frequency.as_deref().unwrap_or(default_frequency);
                ExportPlan::scheduled(parse_frequency(frequency)?)
            }
            ExportSource {
                event: Some(path), ..
            } => {
                let event = ExportEvent::from_file(path)?;
                ExportPlan {
                    countries: parse_countries(event.countries.as_deref().unwrap_or_default())?,
                    scheduled: event
                        .fetch_scheduled_exports
                        .as_deref()
                        .map(str::trim)
                        .filter(|frequency| !frequency.is_empty())
                        .map(parse_frequency)
                        .transpose()?,
                    track: false,
                }
            }
            _ => {
                return Err(ExporterError::Configuration(
                    "One of --countries, --fetch-scheduled-exports or --event is required"
                        .to_string(),
                ))
            }
        };

        Ok(plan.with_tracking(self.track))
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let plan = match self.plan(&config.discovery.default_frequency) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Invalid export arguments");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let orchestrator = match self.orchestrator(&config) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize exporter");
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Triggering exports...");
        println!();

        let summary = match orchestrator.run(&plan).await {
            Ok(s) => s,
            Err(ExporterError::Discovery(message)) => {
                tracing::error!(error = %message, "Discovery failed");
                eprintln!("Discovery failed: {message}");
                return Ok(4);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary);
        Ok(0)
    }

    fn orchestrator(&self, config: &ExporterConfig) -> crate::domain::Result<ExportOrchestrator> {
        let orchestrator = ExportOrchestrator::from_config(config)?;
        Ok(match &self.result_path {
            Some(path) => orchestrator.with_result_path(path),
            None => orchestrator,
        })
    }
}

fn parse_countries(codes: &[String]) -> crate::domain::Result<Vec<CountryCode>> {
    codes
        .iter()
        .map(|code| CountryCode::new(code).map_err(ExporterError::Validation))
        .collect()
}

fn parse_frequency(frequency: &str) -> crate::domain::Result<Frequency> {
    Frequency::new(frequency).map_err(ExporterError::Validation)
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Exports: {}", summary.total_exports);
    println!("  Submitted: {}", summary.submitted());
    for task_id in &summary.task_ids {
        println!("    - {task_id}");
    }

    if let Some(report) = &summary.tracking {
        println!("  Succeeded: {}", report.succeeded());
        println!("  Failed: {}", report.failed());
        for (task_id, _) in report.results.iter().filter(|(_, o)| !o.is_success()) {
            println!("    - {task_id}: {FAILURE_MARKER}");
        }
        println!("  Results: {}", report.result_path.display());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.is_successful() {
        println!("✅ Export completed successfully!");
    } else {
        println!("⚠️  Export completed with failed tasks");
    }
}
