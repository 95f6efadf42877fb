//! Waiting between attempts
//!
//! Every wait in the pipeline (transport backoff, rate-limit cooldown, poll
//! interval) goes through [`Pause`], so the waits can be observed in tests
//! without actually sleeping.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Something that can suspend the pipeline for a while
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Records requested waits and returns immediately
#[derive(Debug, Default)]
pub struct RecordingPause {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    /// All waits requested so far, in order
    pub fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .map(|waits| waits.clone())
            .unwrap_or_default()
    }

    /// How many waits of exactly `duration` were requested
    pub fn count(&self, duration: Duration) -> usize {
        self.waits().iter().filter(|d| **d == duration).count()
    }
}

#[async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_pause_records_in_order() {
        let pause = RecordingPause::new();
        pause.pause(Duration::from_secs(61)).await;
        pause.pause(Duration::from_secs(30)).await;
        pause.pause(Duration::from_secs(30)).await;

        assert_eq!(
            pause.waits(),
            vec![
                Duration::from_secs(61),
                Duration::from_secs(30),
                Duration::from_secs(30)
            ]
        );
        assert_eq!(pause.count(Duration::from_secs(30)), 2);
    }

    #[tokio::test]
    async fn test_tokio_pause_zero_returns_immediately() {
        TokioPause.pause(Duration::ZERO).await;
    }
}
