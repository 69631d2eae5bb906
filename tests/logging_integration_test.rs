//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so only
//! one test here calls `init_logging` successfully.

use std::time::Duration;
use tempfile::TempDir;
use vigil::config::LoggingConfig;
use vigil::logging::init_logging;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = init_logging("verbose", &LoggingConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_file_logging_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).unwrap();
    tracing::info!(target: "vigil", page = 1, records = 20, "Page fetched");
    vigil::log_retry_attempt!(1, 3, Duration::from_millis(1000), "Server error: 503");
    drop(guard);

    assert!(log_path.exists());
    let contents = std::fs::read_to_string(log_path.join("vigil.log")).unwrap();
    let first_line = contents.lines().next().unwrap();
    let event: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(event["fields"]["message"], "Page fetched");
    assert_eq!(event["fields"]["records"], 20);
}
