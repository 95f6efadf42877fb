//! Export pipeline stages and orchestration
//!
//! - [`discovery`] - explicit countries plus scheduled exports
//! - [`request`] - template merging
//! - [`submission`] - snapshot submission with rate-limit cooldown
//! - [`tracking`] - task status polling
//! - [`coordinator`] - the pipeline end to end

pub mod coordinator;
pub mod discovery;
pub mod request;
pub mod submission;
pub mod summary;
pub mod tracking;

pub use coordinator::{ExportOrchestrator, ExportPlan};
pub use discovery::Discovery;
pub use request::{ExportRequest, RequestBuilder};
pub use submission::{CooldownPolicy, Submitter};
pub use summary::{ExportSummary, TrackingReport};
pub use tracking::Tracker;
