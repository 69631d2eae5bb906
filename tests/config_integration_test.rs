//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX to avoid
//! interference between tests.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use vigil::config::load_config;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VIGIL_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VIGIL_APPLICATION_DRY_RUN");
    std::env::remove_var("VIGIL_API_BASE_URL");
    std::env::remove_var("VIGIL_API_KEY");
    std::env::remove_var("VIGIL_RETRY_MAX_ATTEMPTS");
    std::env::remove_var("VIGIL_PAGINATION_INTER_PAGE_DELAY_MS");
    std::env::remove_var("TEST_VIGIL_API_KEY");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[api]
base_url = "https://assessment.example.com/api"
api_key = "key-12345"
api_key_header = "x-custom-key"
patients_path = "/v2/patients"
submit_path = "/v2/submit"
timeout_seconds = 10

[pagination]
max_page_size = 50
default_page_size = 10
inter_page_delay_ms = 250

[retry]
max_attempts = 5
base_delay_ms = 200
rate_limit_delay_ms = 1500

[logging]
local_enabled = true
local_path = "/var/log/vigil"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.api.base_url, "https://assessment.example.com/api");
    assert_eq!(config.api.api_key.expose_secret(), "key-12345");
    assert_eq!(config.api.api_key_header, "x-custom-key");
    assert_eq!(config.api.patients_path, "/v2/patients");
    assert_eq!(config.api.submit_path, "/v2/submit");
    assert_eq!(config.api.timeout_seconds, 10);
    assert_eq!(config.pagination.max_page_size, 50);
    assert_eq!(config.pagination.default_page_size, 10);
    assert_eq!(config.pagination.inter_page_delay_ms, 250);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_delay_ms, 200);
    assert_eq!(config.retry.rate_limit_delay_ms, 1500);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "https://assessment.example.com/api"
api_key = "key-12345"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.api.api_key_header, "x-api-key");
    assert_eq!(config.api.patients_path, "/patients");
    assert_eq!(config.api.submit_path, "/submit-assessment");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.pagination.max_page_size, 20);
    assert_eq!(config.pagination.default_page_size, 5);
    assert_eq!(config.pagination.inter_page_delay_ms, 500);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.retry.rate_limit_delay_ms, 2000);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_VIGIL_API_KEY", "substituted-key");

    let temp_file = write_config(
        r#"
[api]
base_url = "https://assessment.example.com/api"
# api_key = "${NOT_SET_AND_COMMENTED_OUT}"
api_key = "${TEST_VIGIL_API_KEY}"
"#,
    );

    let result = load_config(temp_file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.api.api_key.expose_secret(), "substituted-key");
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "https://assessment.example.com/api"
api_key = "${TEST_VIGIL_API_KEY}"
"#,
    );

    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("VIGIL_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("VIGIL_API_BASE_URL", "http://localhost:9000/api");
    std::env::set_var("VIGIL_API_KEY", "override-key");
    std::env::set_var("VIGIL_RETRY_MAX_ATTEMPTS", "7");
    std::env::set_var("VIGIL_PAGINATION_INTER_PAGE_DELAY_MS", "not-a-number");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[api]
base_url = "https://assessment.example.com/api"
api_key = "file-key"

[pagination]
inter_page_delay_ms = 100
"#,
    );

    let result = load_config(temp_file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.api.base_url, "http://localhost:9000/api");
    assert_eq!(config.api.api_key.expose_secret(), "override-key");
    assert_eq!(config.retry.max_attempts, 7);
    // Unparseable numeric overrides are ignored
    assert_eq!(config.pagination.inter_page_delay_ms, 100);
}

#[test]
fn test_api_key_can_come_from_environment_only() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("VIGIL_API_KEY", "env-only-key");

    let temp_file = write_config(
        r#"
[api]
base_url = "https://assessment.example.com/api"
"#,
    );

    let result = load_config(temp_file.path());
    cleanup_env_vars();

    assert!(result.is_ok());
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        // Missing API key
        r#"
[api]
base_url = "https://assessment.example.com/api"
"#,
        // Bad scheme
        r#"
[api]
base_url = "ftp://assessment.example.com"
api_key = "k"
"#,
        // Default page size above the maximum
        r#"
[api]
base_url = "https://assessment.example.com/api"
api_key = "k"

[pagination]
max_page_size = 5
default_page_size = 10
"#,
        // Zero attempts
        r#"
[api]
base_url = "https://assessment.example.com/api"
api_key = "k"

[retry]
max_attempts = 0
"#,
        // Unknown log level
        r#"
[application]
log_level = "verbose"

[api]
base_url = "https://assessment.example.com/api"
api_key = "k"
"#,
    ];

    for content in cases {
        let temp_file = write_config(content);
        assert!(
            load_config(temp_file.path()).is_err(),
            "expected validation failure for:\n{content}"
        );
    }
}

#[test]
fn test_missing_file_is_error() {
    assert!(load_config("/nonexistent/vigil.toml").is_err());
}
