//! Services module
//!
//! This module contains business logic services

pub mod absence;
pub mod attendance;
pub mod auth;
pub mod cache;
pub mod class;
pub mod dashboard;
pub mod enrollment;
pub mod finance;
pub mod functions;
pub mod notification;
pub mod person;
pub mod workflow;

// Re-export commonly used services
pub use absence::{AbsenceService, SweepReport};
pub use attendance::AttendanceService;
pub use auth::{AuthService, Permission};
pub use cache::CacheService;
pub use class::ClassService;
pub use dashboard::DashboardService;
pub use enrollment::EnrollmentService;
pub use finance::FinanceService;
pub use functions::{FunctionsClient, FunctionResponse, TemplateInfo};
pub use notification::NotificationService;
pub use person::PersonService;
pub use workflow::WorkflowService;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::session::SessionStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub person_service: PersonService,
    pub class_service: ClassService,
    pub enrollment_service: EnrollmentService,
    pub attendance_service: AttendanceService,
    pub notification_service: NotificationService,
    pub absence_service: AbsenceService,
    pub auth_service: AuthService,
    pub finance_service: FinanceService,
    pub workflow_service: WorkflowService,
    pub dashboard_service: DashboardService,
    pub functions_client: FunctionsClient,
    pub cache_service: CacheService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: Settings,
        database: DatabaseService,
        sessions: SessionStore,
    ) -> Result<Self> {
        let functions_client = FunctionsClient::new(settings.functions.clone())?;
        let cache_service = CacheService::new(settings.clone())?;

        let person_service = PersonService::new(database.people.clone());
        let class_service = ClassService::new(
            database.classes.clone(),
            database.courses.clone(),
            database.enrollments.clone(),
            database.events.clone(),
        );
        let enrollment_service = EnrollmentService::new(
            database.enrollments.clone(),
            database.people.clone(),
            database.classes.clone(),
            database.events.clone(),
        );
        let attendance_service = AttendanceService::new(
            database.events.clone(),
            database.classes.clone(),
            database.enrollments.clone(),
            database.rpc.clone(),
        );
        let notification_service = NotificationService::new(database.notifications.clone());
        let absence_service = AbsenceService::new(
            database.people.clone(),
            notification_service.clone(),
            settings.sweep.clone(),
        );
        let auth_service =
            AuthService::new(database.people.clone(), database.rpc.clone(), sessions);
        let finance_service = FinanceService::new(
            database.finance.clone(),
            database.people.clone(),
            functions_client.clone(),
            settings.features.clone(),
        );
        let workflow_service = WorkflowService::new(database.workflows.clone());
        let dashboard_service = DashboardService::new(database, cache_service.clone());

        Ok(Self {
            person_service,
            class_service,
            enrollment_service,
            attendance_service,
            notification_service,
            absence_service,
            auth_service,
            finance_service,
            workflow_service,
            dashboard_service,
            functions_client,
            cache_service,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let cache_healthy = self.cache_service.health_check().await.unwrap_or(false);

        ServiceHealthStatus { cache_healthy }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub cache_healthy: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.cache_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.cache_healthy {
            issues.push("Redis cache connection failed".to_string());
        }

        issues
    }
}
