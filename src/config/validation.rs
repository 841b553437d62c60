//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EkklesiaError, Result};

use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_functions_config(&settings.functions)?;
    validate_session_config(&settings.session)?;
    validate_sweep_config(&settings.sweep)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EkklesiaError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(EkklesiaError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EkklesiaError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EkklesiaError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate functions gateway configuration
fn validate_functions_config(config: &super::FunctionsConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(EkklesiaError::Config(
            "Functions gateway base URL is required".to_string(),
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| EkklesiaError::Config(format!("Invalid functions gateway URL: {e}")))?;

    if config.timeout_seconds == 0 {
        return Err(EkklesiaError::Config(
            "Functions gateway timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.key_prefix.is_empty() {
        return Err(EkklesiaError::Config(
            "Session key prefix is required".to_string(),
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(EkklesiaError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate sweep configuration
fn validate_sweep_config(config: &super::SweepConfig) -> Result<()> {
    if config.interval_minutes == 0 {
        return Err(EkklesiaError::Config(
            "Sweep interval must be greater than 0".to_string(),
        ));
    }

    if config.notification_window_hours <= 0 {
        return Err(EkklesiaError::Config(
            "Notification window must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EkklesiaError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EkklesiaError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn rejects_zero_connections() {
        let mut settings = Settings::default();
        settings.database.max_connections = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_malformed_gateway_url() {
        let mut settings = Settings::default();
        settings.functions.base_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
