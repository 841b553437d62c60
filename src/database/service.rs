//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::repositories::{
    ClassRepository, CongregationRepository, CourseRepository, EnrollmentRepository,
    EventRepository, FinanceRepository, NotificationRepository, PersonRepository,
    WorkflowRepository,
};
use crate::database::rpc::RpcClient;
use crate::database::DatabasePool;
use crate::models::{EnrollmentStatus, FeeStatus, PersonRole, PersonStatus};
use crate::utils::errors::EkklesiaError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub people: PersonRepository,
    pub congregations: CongregationRepository,
    pub courses: CourseRepository,
    pub classes: ClassRepository,
    pub enrollments: EnrollmentRepository,
    pub events: EventRepository,
    pub notifications: NotificationRepository,
    pub finance: FinanceRepository,
    pub workflows: WorkflowRepository,
    pub rpc: RpcClient,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            people: PersonRepository::new(pool.clone()),
            congregations: CongregationRepository::new(pool.clone()),
            courses: CourseRepository::new(pool.clone()),
            classes: ClassRepository::new(pool.clone()),
            enrollments: EnrollmentRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            finance: FinanceRepository::new(pool.clone()),
            workflows: WorkflowRepository::new(pool.clone()),
            rpc: RpcClient::new(pool),
        }
    }

    /// Dashboard counts: people per role/status, enrollment tallies, pending
    /// approvals, overdue fees
    pub async fn ministry_stats(&self) -> Result<serde_json::Value, EkklesiaError> {
        let total_people = self.people.count().await?;
        let active_people = self
            .people
            .count_by_status(PersonStatus::Active.as_str())
            .await?;
        let students = self
            .people
            .count_by_role(PersonRole::Student.as_str())
            .await?;
        let professors = self
            .people
            .count_by_role(PersonRole::Professor.as_str())
            .await?;
        let active_enrollments = self
            .enrollments
            .count_by_status(EnrollmentStatus::Active)
            .await?;
        let completed_enrollments = self
            .enrollments
            .count_by_status(EnrollmentStatus::Completed)
            .await?;
        let pending_workflows = self.workflows.list_pending().await?.len() as i64;
        let overdue_fees = self.finance.list_by_status(FeeStatus::Overdue).await?.len() as i64;

        let stats = serde_json::json!({
            "people": {
                "total": total_people,
                "active": active_people,
                "inactive": total_people - active_people,
                "students": students,
                "professors": professors,
            },
            "enrollments": {
                "active": active_enrollments,
                "completed": completed_enrollments,
            },
            "pending_workflows": pending_workflows,
            "overdue_fees": overdue_fees,
        });

        Ok(stats)
    }
}
