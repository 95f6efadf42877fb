//! Raw Data API adapter
//!
//! This module provides the HTTP client for the Raw Data API, the trait it
//! implements, and the response models.

mod api;
pub mod client;
pub mod models;

pub use api::RawDataApi;
pub use client::{RawDataClient, RetryPolicy, ACCESS_TOKEN_HEADER};
pub use models::{FeatureCollection, SnapshotResponse};
