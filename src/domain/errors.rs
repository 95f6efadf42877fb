//! Domain error types
//!
//! This module defines the error hierarchy for the exporter. Errors are
//! domain-specific and don't expose third-party HTTP client types.

use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors (missing template, missing credential, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Raw Data API errors
    #[error("Raw Data API error: {0}")]
    RawData(#[from] RawDataError),

    /// Scheduled export discovery failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Submission kept hitting the rate limit past the configured cooldown cap
    #[error("Rate limit still reached after {cooldowns} cooldown rounds")]
    RateLimited { cooldowns: u32 },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Raw Data API specific errors
#[derive(Debug, Error)]
pub enum RawDataError {
    /// Failed to reach the API
    #[error("Failed to connect to Raw Data API: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The transport retry budget ran out on a retryable status
    #[error("Retry budget exhausted after {attempts} attempts (last status {status})")]
    RetryBudgetExhausted { attempts: u32, status: u16 },

    /// Non-success status that is not retried
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl RawDataError {
    /// Whether retrying the same request may succeed
    ///
    /// Connection failures, timeouts, 429 and 5xx responses are transient.
    /// Malformed responses and other client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            RawDataError::ConnectionFailed(_) | RawDataError::Timeout(_) => true,
            RawDataError::RetryBudgetExhausted { .. } => true,
            RawDataError::UnexpectedStatus { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            RawDataError::InvalidResponse(_) => false,
        }
    }
}

impl ExporterError {
    /// Whether this error wraps a transient API failure
    pub fn is_transient(&self) -> bool {
        matches!(self, ExporterError::RawData(e) if e.is_transient())
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_exporter_error_display() {
        let err = ExporterError::Configuration("Access token missing".to_string());
        assert_eq!(err.to_string(), "Configuration error: Access token missing");
    }

    #[test]
    fn test_raw_data_error_conversion() {
        let api_err = RawDataError::ConnectionFailed("Network error".to_string());
        let err: ExporterError = api_err.into();
        assert!(matches!(err, ExporterError::RawData(_)));
        assert!(err.is_transient());
    }

    #[test_case(429, true ; "too many requests")]
    #[test_case(500, true ; "internal server error")]
    #[test_case(502, true ; "bad gateway")]
    #[test_case(400, false ; "bad request")]
    #[test_case(404, false ; "not found")]
    fn test_unexpected_status_classification(status: u16, transient: bool) {
        let err = RawDataError::UnexpectedStatus {
            status,
            body: String::new(),
        };
        assert_eq!(err.is_transient(), transient);
    }

    #[test]
    fn test_invalid_response_is_not_transient() {
        let err = RawDataError::InvalidResponse("missing field `features`".to_string());
        assert!(!err.is_transient());
        assert!(!ExporterError::from(err).is_transient());
    }

    #[test]
    fn test_non_api_errors_are_not_transient() {
        assert!(!ExporterError::Discovery("gave up".to_string()).is_transient());
        assert!(!ExporterError::RateLimited { cooldowns: 3 }.is_transient());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ExporterError = io_err.into();
        assert!(matches!(err, ExporterError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ExporterError = json_err.into();
        assert!(matches!(err, ExporterError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ExporterError = toml_err.into();
        assert!(matches!(err, ExporterError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
