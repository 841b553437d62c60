//! Error handling for Ekklesia
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the Ekklesia application
#[derive(Error, Debug)]
pub enum EkklesiaError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Functions gateway error: {0}")]
    Functions(#[from] FunctionsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Person not found: {person_id}")]
    PersonNotFound { person_id: i64 },

    #[error("Class not found: {class_id}")]
    ClassNotFound { class_id: i64 },

    #[error("Enrollment not found: {enrollment_id}")]
    EnrollmentNotFound { enrollment_id: i64 },

    #[error("{0}")]
    BusinessRule(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Session expired or missing")]
    SessionExpired,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// RPC invocation specific errors
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Unknown remote procedure: {0}")]
    UnknownProcedure(String),

    #[error("Remote procedure failed: {0}")]
    CallFailed(String),

    #[error("Invalid RPC envelope: {0}")]
    InvalidEnvelope(String),
}

/// Functions gateway specific errors
#[derive(Error, Debug)]
pub enum FunctionsError {
    #[error("Function request failed: {0}")]
    RequestFailed(String),

    #[error("Function endpoint timeout")]
    Timeout,

    #[error("Invalid function response: {0}")]
    InvalidResponse(String),

    #[error("Functions gateway unavailable")]
    ServiceUnavailable,
}

/// Result type alias for Ekklesia operations
pub type Result<T> = std::result::Result<T, EkklesiaError>;

/// Result type alias for functions gateway operations
pub type FunctionsResult<T> = std::result::Result<T, FunctionsError>;

impl EkklesiaError {
    /// Check if the error is recoverable (safe to retry an idempotent read)
    pub fn is_recoverable(&self) -> bool {
        match self {
            EkklesiaError::Database(_) => true,
            EkklesiaError::Migration(_) => false,
            EkklesiaError::Rpc(_) => false,
            EkklesiaError::Functions(_) => true,
            EkklesiaError::Config(_) => false,
            EkklesiaError::PermissionDenied(_) => false,
            EkklesiaError::PersonNotFound { .. } => false,
            EkklesiaError::ClassNotFound { .. } => false,
            EkklesiaError::EnrollmentNotFound { .. } => false,
            EkklesiaError::BusinessRule(_) => false,
            EkklesiaError::Redis(_) => true,
            EkklesiaError::Http(_) => true,
            EkklesiaError::Serialization(_) => false,
            EkklesiaError::Io(_) => true,
            EkklesiaError::UrlParse(_) => false,
            EkklesiaError::Authentication(_) => false,
            EkklesiaError::SessionExpired => false,
            EkklesiaError::InvalidInput(_) => false,
            EkklesiaError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EkklesiaError::Migration(_) => ErrorSeverity::Critical,
            EkklesiaError::Config(_) => ErrorSeverity::Critical,
            EkklesiaError::PermissionDenied(_) => ErrorSeverity::Warning,
            EkklesiaError::Authentication(_) => ErrorSeverity::Warning,
            EkklesiaError::SessionExpired => ErrorSeverity::Warning,
            EkklesiaError::BusinessRule(_) => ErrorSeverity::Info,
            EkklesiaError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
