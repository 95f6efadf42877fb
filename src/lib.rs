// HDX Exporter - Raw Data API export trigger
// Copyright (c) 2025 HDX Exporter Contributors
// Licensed under the MIT License

//! # HDX Exporter
//!
//! Triggers snapshot exports on the HOT Raw Data API for publication to the
//! Humanitarian Data Exchange, and optionally waits for them to finish.
//!
//! ## Overview
//!
//! A run goes through these stages, strictly one after another:
//!
//! - **Discovery**: countries given explicitly, plus scheduled exports fetched
//!   from the API for an interval
//! - **Request building**: each export descriptor is merged into a base
//!   request template
//! - **Submission**: every request is POSTed; 429/502 are retried, and a
//!   persistent rate limit is waited out with a cooldown
//! - **Tracking** (optional): each task is polled until it finishes and the
//!   outcomes are written to a JSON document
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The export pipeline and the pause seam
//! - [`adapters`] - Raw Data API client
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration and request template loading
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hdx_exporter::config::load_config;
//! use hdx_exporter::core::export::{ExportOrchestrator, ExportPlan};
//! use hdx_exporter::domain::CountryCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("hdx-exporter.toml")?;
//!     let orchestrator = ExportOrchestrator::from_config(&config)?;
//!
//!     let plan = ExportPlan::countries(vec![CountryCode::new("KEN")?]).with_tracking(true);
//!     let summary = orchestrator.run(&plan).await?;
//!
//!     println!("Submitted {} exports", summary.submitted());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type is
//! [`domain::ExporterError`]. Tracking is the exception: a task whose status
//! can't be fetched is recorded as failed instead of aborting the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
