//! Validate config command implementation
//!
//! Loads the configuration the same way `export` does, resolves the request
//! template and prints the effective settings.

use crate::config::{load_config_or_env, ExportTemplate};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("environment");
        tracing::info!(config = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match load_config_or_env(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let template = match ExportTemplate::resolve(&config.template) {
            Ok(t) => {
                println!("✅ Request template resolved");
                t
            }
            Err(e) => {
                println!("❌ Failed to resolve request template");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Raw Data API: {}", config.api.normalized_base_url());
        println!(
            "  Access Token: {}",
            if config.api.access_token.is_some() {
                "***"
            } else {
                "(not set)"
            }
        );
        println!("  Timeout: {}s", config.api.timeout_seconds);
        println!(
            "  Template Fields: {:?}",
            template.fields().keys().collect::<Vec<_>>()
        );
        println!("  Merge Strategy: {:?}", config.template.merge_strategy);
        println!(
            "  Retries: {} on {:?}",
            config.submission.max_retries, config.submission.retry_status_codes
        );
        println!(
            "  Rate Limit Cooldown: {}s",
            config.submission.rate_limit_cooldown_secs
        );
        println!(
            "  Max Cooldowns: {}",
            config
                .submission
                .max_cooldowns
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unlimited".to_string())
        );
        println!("  Discovery Attempts: {}", config.discovery.max_attempts);
        println!("  Poll Interval: {}s", config.tracking.poll_interval_secs);
        println!("  Result Path: {}", config.tracking.result_path);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_file_is_config_error() {
        let args = ValidateArgs {};
        let code = args
            .execute(Some("/nonexistent/hdx-exporter.toml"))
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
