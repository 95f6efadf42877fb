//! Core business logic.
//!
//! # Modules
//!
//! - [`export`] - the export pipeline and its stages
//! - [`pause`] - waiting between attempts
//!
//! # Export Workflow
//!
//! 1. **Discover**: explicit countries, then scheduled exports from the API
//! 2. **Build**: merge each descriptor into a copy of the request template
//! 3. **Submit**: POST each request, cooling down while rate limited
//! 4. **Track** (optional): poll every task until it is terminal
//! 5. **Persist**: write the task id → result document
//!
//! # Example
//!
//! ```rust,no_run
//! use hdx_exporter::config::load_config;
//! use hdx_exporter::core::export::{ExportOrchestrator, ExportPlan};
//! use hdx_exporter::domain::CountryCode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hdx-exporter.toml")?;
//! let orchestrator = ExportOrchestrator::from_config(&config)?;
//!
//! let plan = ExportPlan::countries(vec![CountryCode::new("KEN")?]).with_tracking(true);
//! let summary = orchestrator.run(&plan).await?;
//! println!("Submitted: {}", summary.submitted());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod pause;
