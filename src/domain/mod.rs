//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TaskId`], [`CountryCode`], [`Frequency`])
//! - **Work units** ([`ExportDescriptor`])
//! - **Task tracking** ([`TaskStatus`], [`TaskStatusReport`], [`TaskOutcome`], [`ResultSet`])
//! - **Error types** ([`ExporterError`], [`RawDataError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use hdx_exporter::domain::{CountryCode, ExportDescriptor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let code = CountryCode::new("KEN")?;
//! let descriptor = ExportDescriptor::for_country(&code);
//! assert_eq!(descriptor.properties["iso3"], "KEN");
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod errors;
pub mod ids;
pub mod result;
pub mod results;
pub mod status;

pub use descriptor::{ExportDescriptor, ISO3_PROPERTY};
pub use errors::{ExporterError, RawDataError};
pub use ids::{CountryCode, Frequency, TaskId};
pub use result::Result;
pub use results::{ResultSet, TaskOutcome, FAILURE_MARKER};
pub use status::{TaskStatus, TaskStatusReport};
