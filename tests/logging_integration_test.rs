//! Integration tests for logging initialization
//!
//! A global subscriber can only be installed once per process, so this file
//! holds a single initialization test.

use hdx_exporter::config::LoggingConfig;
use hdx_exporter::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();
    tracing::info!(task_id = "t-1", "Task finished, moving to the next one");
    drop(guard);

    assert!(log_path.is_dir());
    assert!(log_path.join("hdx-exporter.log").exists());
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let config = LoggingConfig::default();
    assert!(init_logging("verbose", &config).is_err());
}
