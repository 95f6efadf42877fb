//! External system integrations.
//!
//! - [`rawdata`] - HOT Raw Data API (snapshot submission, task status,
//!   scheduled export discovery)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! pipeline can be exercised against mock servers or fakes:
//!
//! ```rust,no_run
//! use hdx_exporter::adapters::rawdata::{RawDataApi, RawDataClient, RetryPolicy};
//! use hdx_exporter::config::ExporterConfig;
//! use hdx_exporter::core::pause::TokioPause;
//! use std::sync::Arc;
//!
//! # fn example(config: &ExporterConfig) -> hdx_exporter::domain::Result<()> {
//! let client = RawDataClient::new(
//!     &config.api,
//!     RetryPolicy::from_config(&config.submission),
//!     Arc::new(TokioPause),
//! )?;
//! println!("Using {}", client.base_url());
//! # Ok(())
//! # }
//! ```

pub mod rawdata;
