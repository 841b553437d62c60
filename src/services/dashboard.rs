//! Dashboard service implementation
//!
//! Ministry-wide counts behind the read-through cache: the overview is the
//! one hot read in the system, so it is the one that goes through the query
//! cache and gets invalidated on demand.

use tracing::debug;

use crate::database::DatabaseService;
use crate::services::cache::CacheService;
use crate::utils::errors::Result;

/// Cache key prefix owned by the dashboard
const DASHBOARD_PREFIX: &str = "dashboard:";

/// Cache TTL for the overview, in seconds
const OVERVIEW_TTL: u64 = 60;

/// Dashboard service for aggregate statistics
#[derive(Clone)]
pub struct DashboardService {
    database: DatabaseService,
    cache: CacheService,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(database: DatabaseService, cache: CacheService) -> Self {
        Self { database, cache }
    }

    /// Ministry overview counts, served through the read-through cache
    pub async fn overview(&self) -> Result<serde_json::Value> {
        self.cache
            .remember(
                &format!("{DASHBOARD_PREFIX}overview"),
                Some(OVERVIEW_TTL),
                || self.database.ministry_stats(),
            )
            .await
    }

    /// Drop cached dashboard reads and recompute the overview
    pub async fn refresh(&self) -> Result<serde_json::Value> {
        let dropped = self.cache.invalidate_prefix(DASHBOARD_PREFIX).await?;
        debug!(dropped = dropped, "Dashboard cache invalidated");

        self.overview().await
    }
}
