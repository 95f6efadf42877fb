//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use regex::Regex;
use secrecy::SecretString;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Environment variable holding the API base URL
pub const ENV_BASE_URL: &str = "RAW_DATA_API_BASE_URL";

/// Environment variable holding the API access token
pub const ENV_AUTH_TOKEN: &str = "RAWDATA_API_AUTH_TOKEN";

/// Environment variable holding the template, inline JSON or a file path
pub const ENV_CONFIG_JSON: &str = "CONFIG_JSON";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use hdx_exporter::config::loader::load_config;
///
/// let config = load_config("hdx-exporter.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finalize(config)
}

/// Builds configuration from defaults and the environment only
///
/// Used when no configuration file is given; the access token and template
/// then come from `RAWDATA_API_AUTH_TOKEN` and `CONFIG_JSON`.
pub fn load_from_env() -> Result<ExporterConfig> {
    finalize(ExporterConfig::default())
}

/// Loads from `path` when given, otherwise from the environment
pub fn load_config_or_env(path: Option<&str>) -> Result<ExporterConfig> {
    match path {
        Some(path) => load_config(path),
        None => load_from_env(),
    }
}

fn finalize(mut config: ExporterConfig) -> Result<ExporterConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExporterError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// The three variables the Raw Data API tooling has always used
/// (`RAW_DATA_API_BASE_URL`, `RAWDATA_API_AUTH_TOKEN`, `CONFIG_JSON`) are
/// honored, plus `HDX_EXPORTER_<SECTION>_<KEY>` for the tunables.
fn apply_env_overrides(config: &mut ExporterConfig) -> Result<()> {
    if let Ok(val) = std::env::var(ENV_BASE_URL) {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var(ENV_AUTH_TOKEN) {
        config.api.access_token = Some(SecretString::new(val));
    }
    if let Ok(val) = std::env::var(ENV_CONFIG_JSON) {
        apply_template_override(config, &val)?;
    }

    if let Ok(val) = std::env::var("HDX_EXPORTER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(timeout) = parse_env("HDX_EXPORTER_API_TIMEOUT_SECONDS")? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(cooldown) = parse_env("HDX_EXPORTER_SUBMISSION_RATE_LIMIT_COOLDOWN_SECS")? {
        config.submission.rate_limit_cooldown_secs = cooldown;
    }
    if let Some(max_cooldowns) = parse_env("HDX_EXPORTER_SUBMISSION_MAX_COOLDOWNS")? {
        config.submission.max_cooldowns = Some(max_cooldowns);
    }
    if let Some(interval) = parse_env("HDX_EXPORTER_TRACKING_POLL_INTERVAL_SECS")? {
        config.tracking.poll_interval_secs = interval;
    }
    if let Ok(val) = std::env::var("HDX_EXPORTER_TRACKING_RESULT_PATH") {
        config.tracking.result_path = val;
    }
    if let Some(enabled) = parse_env("HDX_EXPORTER_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("HDX_EXPORTER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// `CONFIG_JSON` holds either the template itself or a path to it
fn apply_template_override(config: &mut ExporterConfig, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.starts_with('{') {
        let inline = serde_json::from_str(trimmed).map_err(|e| {
            ExporterError::Configuration(format!("{ENV_CONFIG_JSON} is not valid JSON: {e}"))
        })?;
        config.template.inline = Some(inline);
    } else {
        config.template.path = Some(trimmed.to_string());
        config.template.inline = None;
    }
    Ok(())
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|e| {
            ExporterError::Configuration(format!("Invalid value '{val}' for {name}: {e}"))
        }),
        Err(_) => Ok(None),
    }
}
