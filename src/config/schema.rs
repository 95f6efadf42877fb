//! Configuration schema types

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Raw Data API base URL
pub const DEFAULT_BASE_URL: &str = "https://api-prod.raw-data.hotosm.org/v1";

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; missing sections fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Raw Data API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Request template source
    #[serde(default)]
    pub template: TemplateConfig,

    /// Snapshot submission retry policy
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Scheduled export discovery
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Task status tracking
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.template.validate()?;
        self.submission.validate()?;
        self.discovery.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Raw Data API connection settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without the endpoint paths
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `Access-Token` header
    /// Stored securely in memory and zeroized on drop
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        let has_token = self
            .access_token
            .as_ref()
            .map(|token| !token.expose_secret().trim().is_empty())
            .unwrap_or(false);
        if !has_token {
            return Err(
                "api.access_token is required (set RAWDATA_API_AUTH_TOKEN)".to_string(),
            );
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// How descriptor properties are applied to the request template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Each property overrides the top-level template field of the same name
    #[default]
    PerKey,

    /// Every property is written to the single field `"key"`; the last one wins
    LastKeyWins,
}

/// Where the request template comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Path to a JSON template file
    #[serde(default = "default_template_path")]
    pub path: Option<String>,

    /// Inline template; takes precedence over `path`
    #[serde(default)]
    pub inline: Option<serde_json::Value>,

    /// Property merge behavior
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
}

impl TemplateConfig {
    fn validate(&self) -> Result<(), String> {
        let has_path = self
            .path
            .as_ref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false);
        if self.inline.is_none() && !has_path {
            return Err("template.path or template.inline must be provided".to_string());
        }
        Ok(())
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: default_template_path(),
            inline: None,
            merge_strategy: MergeStrategy::default(),
        }
    }
}

/// Snapshot submission retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Transport retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Status codes that trigger a transport retry
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: Vec<u16>,

    /// Backoff factor in seconds
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for a single backoff delay
    #[serde(default = "default_backoff_max_secs")]
    pub backoff_max_secs: u64,

    /// Wait after the retry budget is exhausted
    #[serde(default = "default_rate_limit_cooldown_secs")]
    pub rate_limit_cooldown_secs: u64,

    /// Maximum cooldown rounds per request (unbounded when absent)
    #[serde(default)]
    pub max_cooldowns: Option<u32>,
}

impl SubmissionConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(code) = self
            .retry_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(format!(
                "submission.retry_status_codes contains invalid HTTP status {code}"
            ));
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            return Err(format!(
                "submission.backoff_factor must be a non-negative number, got {}",
                self.backoff_factor
            ));
        }

        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_status_codes: default_retry_status_codes(),
            backoff_factor: default_backoff_factor(),
            backoff_max_secs: default_backoff_max_secs(),
            rate_limit_cooldown_secs: default_rate_limit_cooldown_secs(),
            max_cooldowns: None,
        }
    }
}

/// Scheduled export discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Attempts before discovery fails the run
    #[serde(default = "default_discovery_attempts")]
    pub max_attempts: u32,

    /// Frequency used when `--fetch-scheduled-exports` has no value
    #[serde(default = "default_frequency")]
    pub default_frequency: String,
}

impl DiscoveryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("discovery.max_attempts must be at least 1".to_string());
        }
        if self.default_frequency.trim().is_empty() {
            return Err("discovery.default_frequency cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_discovery_attempts(),
            default_frequency: default_frequency(),
        }
    }
}

/// Task status tracking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Wait between status checks of an unfinished task
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Where the result document is written
    #[serde(default = "default_result_path")]
    pub result_path: String,
}

impl TrackingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            result_path: default_result_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_template_path() -> Option<String> {
    Some("config.json".to_string())
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_status_codes() -> Vec<u16> {
    vec![429, 502]
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_backoff_max_secs() -> u64 {
    120
}

fn default_rate_limit_cooldown_secs() -> u64 {
    61
}

fn default_discovery_attempts() -> u32 {
    3
}

fn default_frequency() -> String {
    "daily".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_result_path() -> String {
    "result.json".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
