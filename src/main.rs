//! Ekklesia Ministry Administration
//!
//! Main application entry point: wires configuration, storage, and services,
//! then runs the periodic sweep worker until shutdown.

use chrono::Utc;
use tracing::{error, info, warn};

use ekklesia::{
    config::Settings,
    database::{connection, DatabaseService},
    services::ServiceFactory,
    session::SessionStore,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ekklesia::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig::from(&settings.database);
    let db_pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&db_pool).await?;

    // Initialize session storage
    info!("Connecting to Redis...");
    let session_store = SessionStore::new(&settings.redis.url, settings.session.clone()).await?;

    // Initialize database service and business services
    info!("Initializing services...");
    let database_service = DatabaseService::new(db_pool);
    let services = ServiceFactory::new(settings.clone(), database_service, session_store)?;

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            warn!("Health check issue: {}", issue);
        }
    }

    info!("Ekklesia sweep worker is ready");

    // Run the periodic sweeps until shutdown
    let interval_secs = settings.sweep.interval_minutes * 60;
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_sweeps(&settings, &services).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Ekklesia has been shut down.");

    Ok(())
}

/// Run every enabled sweep once. Sweep failures are logged, never fatal.
async fn run_sweeps(settings: &Settings, services: &ServiceFactory) {
    let now = Utc::now();

    if settings.features.absence_sweep {
        match services.absence_service.run_sweep(now).await {
            Ok(report) => {
                info!(
                    scanned = report.scanned,
                    flagged = report.flagged,
                    created = report.notifications_created,
                    skipped = report.duplicates_skipped,
                    "Absence sweep finished"
                );
            }
            Err(e) => error!(error = %e, "Absence sweep failed"),
        }
    }

    if settings.features.overdue_fee_sweep {
        match services
            .finance_service
            .run_overdue_sweep(now.date_naive())
            .await
        {
            Ok(flipped) => info!(flipped = flipped, "Overdue fee sweep finished"),
            Err(e) => error!(error = %e, "Overdue fee sweep failed"),
        }
    }
}
