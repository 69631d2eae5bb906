//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Vigil configuration file.

use crate::config::parse_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match parse_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Dry Run: {}", config.application.dry_run);
                println!("  API Base URL: {}", config.api.base_url);
                println!("  API Key Header: {}", config.api.api_key_header);
                println!("  Patients Path: {}", config.api.patients_path);
                println!("  Submit Path: {}", config.api.submit_path);
                println!("  Timeout: {}s", config.api.timeout_seconds);
                println!("  Page Size: {}", config.pagination.max_page_size);
                println!(
                    "  Inter-page Delay: {}ms",
                    config.pagination.inter_page_delay_ms
                );
                println!(
                    "  Retry: {} attempts, {}ms base backoff, {}ms rate-limit delay",
                    config.retry.max_attempts,
                    config.retry.base_delay_ms,
                    config.retry.rate_limit_delay_ms
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
