//! Configuration management for the exporter.
//!
//! Configuration is resolved once at startup into an [`ExporterConfig`] and
//! passed explicitly to every component.
//!
//! # Sources
//!
//! - An optional TOML file with `${VAR_NAME}` substitution
//! - Environment overrides (`RAW_DATA_API_BASE_URL`, `RAWDATA_API_AUTH_TOKEN`,
//!   `CONFIG_JSON`, `HDX_EXPORTER_*`)
//! - Defaults matching the public Raw Data API
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://api-prod.raw-data.hotosm.org/v1"
//! access_token = "${RAWDATA_API_AUTH_TOKEN}"
//!
//! [template]
//! path = "config.json"
//!
//! [submission]
//! rate_limit_cooldown_secs = 61
//!
//! [tracking]
//! poll_interval_secs = 30
//! result_path = "result.json"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hdx_exporter::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hdx-exporter.toml")?;
//! println!("Raw Data API: {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod template;

pub use loader::{load_config, load_config_or_env, load_from_env};
pub use schema::{
    ApiConfig, ApplicationConfig, DiscoveryConfig, ExporterConfig, LoggingConfig,
    MergeStrategy, SubmissionConfig, TemplateConfig, TrackingConfig,
};
pub use template::ExportTemplate;
