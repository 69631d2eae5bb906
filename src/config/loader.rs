//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VigilConfig;
use super::secret::secret_string;
use crate::domain::errors::VigilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VigilConfig
/// 4. Applies environment variable overrides (VIGIL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use vigil::config::loader::load_config;
///
/// let config = load_config("vigil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let config = parse_config(path)?;

    config.validate().map_err(|e| {
        VigilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration without validating it
///
/// Used by commands that want to apply CLI overrides before validation.
pub fn parse_config(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VigilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VigilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VigilConfig = toml::from_str(&contents)
        .map_err(|e| VigilError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VigilError::Configuration(format!("Invalid substitution pattern: {e}")))?;
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
                    processed_line = processed_line.replace(&cap[0], &value);
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
        return Err(VigilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VIGIL_* prefix
///
/// Environment variables follow the pattern: VIGIL_<SECTION>_<KEY>, with
/// `VIGIL_API_KEY` as the conventional name for the credential.
/// Unparseable numeric values are ignored.
fn apply_env_overrides(config: &mut VigilConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("VIGIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("VIGIL_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // API overrides
    if let Ok(val) = std::env::var("VIGIL_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("VIGIL_API_KEY") {
        config.api.api_key = secret_string(val);
    }
    if let Ok(val) = std::env::var("VIGIL_API_KEY_HEADER") {
        config.api.api_key_header = val;
    }
    if let Ok(val) = std::env::var("VIGIL_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }

    // Pagination overrides
    if let Ok(val) = std::env::var("VIGIL_PAGINATION_MAX_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.pagination.max_page_size = size;
        }
    }
    if let Ok(val) = std::env::var("VIGIL_PAGINATION_INTER_PAGE_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.pagination.inter_page_delay_ms = delay;
        }
    }

    // Retry overrides
    if let Ok(val) = std::env::var("VIGIL_RETRY_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.retry.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("VIGIL_RETRY_BASE_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.retry.base_delay_ms = delay;
        }
    }
    if let Ok(val) = std::env::var("VIGIL_RETRY_RATE_LIMIT_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.retry.rate_limit_delay_ms = delay;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VIGIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VIGIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
