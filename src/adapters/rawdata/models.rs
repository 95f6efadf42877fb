//! Raw Data API response models

use crate::domain::ExportDescriptor;
use serde::Deserialize;

/// Response of `POST /custom/snapshot/`
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    /// Identifier of the queued task
    pub task_id: String,

    /// Status link, when the server sends one
    #[serde(default)]
    pub track_link: Option<String>,
}

/// Response of `GET /hdx/queries/scheduled/`
///
/// A GeoJSON feature collection; each feature is one scheduled export.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<ExportDescriptor>,
}
