//! Configuration management for Vigil.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Vigil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VIGIL_<SECTION>_<KEY>` overrides
//! - Default values for every tunable except the API location and key
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://assessment.example.com/api"
//! api_key = "${VIGIL_API_KEY}"
//!
//! [pagination]
//! max_page_size = 20
//! inter_page_delay_ms = 500
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 1000
//! rate_limit_delay_ms = 2000
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use vigil::config::load_config;
//!
//! # fn example() {
//! match load_config("vigil.toml") {
//!     Ok(config) => println!("Configuration valid: {}", config.api.base_url),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApiConfig, ApplicationConfig, LoggingConfig, PaginationConfig, RetryConfig, VigilConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
