//! Discovery - which entities to export
//!
//! Explicit country codes and scheduled exports are independent, additive
//! sources. Countries come first, in the order given, followed by the
//! scheduled features in the order the API returned them.

use crate::adapters::rawdata::RawDataApi;
use crate::domain::{CountryCode, ExportDescriptor, ExporterError, Frequency, Result};
use std::sync::Arc;

/// Collects export descriptors from the configured sources
pub struct Discovery {
    api: Arc<dyn RawDataApi>,
    max_attempts: u32,
}

impl Discovery {
    pub fn new(api: Arc<dyn RawDataApi>, max_attempts: u32) -> Self {
        Self {
            api,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Build the descriptor queue
    ///
    /// # Errors
    ///
    /// Fails the whole run when scheduled exports were requested and could
    /// not be fetched. There is no partial result.
    pub async fn discover(
        &self,
        countries: &[CountryCode],
        scheduled: Option<&Frequency>,
    ) -> Result<Vec<ExportDescriptor>> {
        let mut descriptors: Vec<ExportDescriptor> =
            countries.iter().map(ExportDescriptor::for_country).collect();

        if let Some(frequency) = scheduled {
            tracing::info!(frequency = %frequency, "Retrieving scheduled exports");
            let scheduled = self.fetch_scheduled(frequency).await?;
            tracing::info!(
                frequency = %frequency,
                count = scheduled.len(),
                "Retrieved scheduled exports"
            );
            descriptors.extend(scheduled);
        }

        tracing::info!(count = descriptors.len(), "Supplied exports");
        Ok(descriptors)
    }

    /// Fetch scheduled exports, retrying transient failures
    pub async fn fetch_scheduled(&self, frequency: &Frequency) -> Result<Vec<ExportDescriptor>> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.api.scheduled_exports(frequency).await {
                Ok(descriptors) => return Ok(descriptors),
                Err(e) if !e.is_transient() => {
                    tracing::error!(
                        attempt = attempt,
                        error = %e,
                        "Scheduled exports request failed with a non-retryable error"
                    );
                    return Err(ExporterError::Discovery(format!(
                        "Failed to fetch scheduled exports: {e}"
                    )));
                }
                Err(e) => {
                    if attempt >= self.max_attempts {
                        tracing::error!(
                            attempts = attempt,
                            error = %e,
                            "Scheduled exports request failed"
                        );
                        return Err(ExporterError::Discovery(format!(
                            "Failed to fetch scheduled exports after {} attempts: {e}",
                            self.max_attempts
                        )));
                    }
                    crate::log_retry_attempt!(attempt, self.max_attempts, e);
                }
            }
        }
    }
}
