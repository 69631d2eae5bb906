//! Configuration schema types
//!
//! This module defines the configuration structure for Vigil.

use crate::config::{secret_string, SecretString};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Main Vigil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Patient API connection
    pub api: ApiConfig,

    /// Page traversal settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Retry and backoff settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VigilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.pagination.validate()?;
        self.retry.validate()?;
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

    /// Dry run mode (analyze but don't submit)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
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

/// Patient API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the assessment service, e.g. `https://assessment.example.com/api`
    pub base_url: String,

    /// Static API key sent with every request
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default = "default_api_key")]
    pub api_key: SecretString,

    /// Header carrying the API key
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// Path of the paginated patient listing
    #[serde(default = "default_patients_path")]
    pub patients_path: String,

    /// Path the assessment is submitted to
    #[serde(default = "default_submit_path")]
    pub submit_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            api_key: default_api_key(),
            api_key_header: default_api_key_header(),
            patients_path: default_patients_path(),
            submit_path: default_submit_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url is not a valid URL: {e}"))?;

        if self.api_key.expose_secret().is_empty() {
            return Err(
                "api.api_key cannot be empty (set it in the config file or via VIGIL_API_KEY)"
                    .to_string(),
            );
        }

        if self.api_key_header.trim().is_empty() {
            return Err("api.api_key_header cannot be empty".to_string());
        }

        for (name, path) in [
            ("api.patients_path", &self.patients_path),
            ("api.submit_path", &self.submit_path),
        ] {
            if !path.starts_with('/') {
                return Err(format!("{name} must start with '/'"));
            }
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Largest `limit` the server accepts; always requested
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Server-side fallback page size; checked against `max_page_size` but
    /// never sent, since every request carries `limit = max_page_size`
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Pause between successful page fetches in milliseconds
    #[serde(default = "default_inter_page_delay_ms")]
    pub inter_page_delay_ms: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            default_page_size: default_page_size(),
            inter_page_delay_ms: default_inter_page_delay_ms(),
        }
    }
}

impl PaginationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_page_size == 0 {
            return Err("pagination.max_page_size must be > 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            return Err(format!(
                "pagination.default_page_size ({}) cannot exceed max_page_size ({})",
                self.default_page_size, self.max_page_size
            ));
        }

        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Extra delay after a 429 response in milliseconds
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("retry.max_attempts must be >= 1".to_string());
        }
        if self.max_attempts > 10 {
            return Err("retry.max_attempts must be <= 10".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
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
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_key() -> SecretString {
    secret_string(String::new())
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

fn default_patients_path() -> String {
    "/patients".to_string()
}

fn default_submit_path() -> String {
    "/submit-assessment".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_page_size() -> u32 {
    20
}

fn default_page_size() -> u32 {
    5
}

fn default_inter_page_delay_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_rate_limit_delay_ms() -> u64 {
    2000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
