//! Ekklesia Ministry Administration
//!
//! Administrative service for a religious-education ministry: people,
//! congregations, courses, classes, enrollments, attendance, finances, and
//! notifications, backed by a relational store, remote procedures, and a
//! serverless functions gateway.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EkklesiaError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use session::{SessionContext, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
