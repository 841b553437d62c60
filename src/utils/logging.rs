//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Ekklesia application.

use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "ekklesia.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log administrative actions with structured data
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log a sweep run outcome
pub fn log_sweep_run(sweep: &str, scanned: usize, affected: usize, duration_ms: u64) {
    info!(
        sweep = sweep,
        scanned = scanned,
        affected = affected,
        duration_ms = duration_ms,
        "Sweep completed"
    );
}

/// Log RPC invocations
pub fn log_rpc_call(procedure: &str, success: bool, duration_ms: u64) {
    if success {
        debug!(
            procedure = procedure,
            duration_ms = duration_ms,
            "RPC call completed"
        );
    } else {
        warn!(
            procedure = procedure,
            duration_ms = duration_ms,
            "RPC call reported failure"
        );
    }
}

/// Log functions gateway errors with context
pub fn log_gateway_error(function: &str, error: &str, context: Option<&str>) {
    error!(
        function = function,
        error = error,
        context = context,
        "Functions gateway error occurred"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
