//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Human-readable console output
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use vigil::logging::init_logging;
//! use vigil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use vigil::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!(1, 3, Duration::from_millis(1000), "Server error: 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Retrying request after error"
        );
    };
}

/// Log a fetched page
///
/// # Example
///
/// ```no_run
/// use vigil::log_page_fetched;
///
/// log_page_fetched!(2, 20, true);
/// ```
#[macro_export]
macro_rules! log_page_fetched {
    ($page:expr, $records:expr, $has_next:expr) => {
        tracing::debug!(
            page = $page,
            records = $records,
            has_next = $has_next,
            "Fetched patient page"
        );
    };
}
