//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vigil.toml")]
    pub output: String,

    /// Include every option with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Vigil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set api.base_url in {}", self.output);
                println!("  2. Put your key in a .env file: VIGIL_API_KEY=...");
                println!("  3. Validate configuration: vigil validate-config");
                println!("  4. Try a dry run: vigil assess --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Vigil Configuration File
# Patient risk assessment client

[application]
log_level = "info"
dry_run = false

[api]
base_url = "https://assessment.example.com/api"
api_key = "${VIGIL_API_KEY}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Vigil Configuration File
# Patient risk assessment client
#
# Values of the form ${NAME} are replaced with environment variables at load
# time. Every setting can also be overridden with a VIGIL_<SECTION>_<KEY>
# environment variable, e.g. VIGIL_RETRY_MAX_ATTEMPTS=5.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (analyze but don't submit)
dry_run = false

# ============================================================================
# Assessment Service
# ============================================================================
[api]
# Base URL of the assessment service
base_url = "https://assessment.example.com/api"

# API key (use environment variable)
api_key = "${VIGIL_API_KEY}"

# Header carrying the API key
api_key_header = "x-api-key"

# Endpoint paths relative to base_url
patients_path = "/patients"
submit_path = "/submit-assessment"

# Per-request timeout in seconds
timeout_seconds = 30

# ============================================================================
# Pagination
# ============================================================================
[pagination]
# Largest page size the service accepts; always requested
max_page_size = 20

# Page size the service falls back to when no limit is sent. Informational
# only: Vigil always requests max_page_size. Must not exceed max_page_size.
default_page_size = 5

# Pause between consecutive page requests
inter_page_delay_ms = 500

# ============================================================================
# Retry Behaviour
# ============================================================================
[retry]
# Total attempts per request, including the first (1-10)
max_attempts = 3

# Backoff before attempt n+1 is base_delay_ms * 2^(n-1)
base_delay_ms = 1000

# Extra wait after a 429 response, added before the backoff
rate_limit_delay_ms = 2000

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write JSON logs to rotating files
local_enabled = false
local_path = "./logs"

# Rotation: daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}
