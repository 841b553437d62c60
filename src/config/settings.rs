//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub functions: FunctionsConfig,
    pub session: SessionConfig,
    pub sweep: SweepConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Functions gateway configuration (serverless endpoints)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FunctionsConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub read_retries: u32,
}

/// Session storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub key_prefix: String,
    pub ttl_seconds: u64,
}

/// Periodic sweep configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    pub interval_minutes: u64,
    pub notification_window_hours: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub absence_sweep: bool,
    pub overdue_fee_sweep: bool,
    pub thermal_printing: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("EKKLESIA"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EkklesiaError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/ekklesia".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "ekklesia:".to_string(),
                ttl_seconds: 300,
            },
            functions: FunctionsConfig {
                base_url: "http://localhost:9000/functions/v1".to_string(),
                timeout_seconds: 10,
                read_retries: 2,
            },
            session: SessionConfig {
                key_prefix: "session:".to_string(),
                ttl_seconds: 86_400,
            },
            sweep: SweepConfig {
                interval_minutes: 60,
                notification_window_hours: 24,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/ekklesia".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig {
                absence_sweep: true,
                overdue_fee_sweep: true,
                thermal_printing: false,
            },
        }
    }
}
