//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod rpc;
pub mod service;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{
    ClassRepository, CongregationRepository, CourseRepository, EnrollmentRepository,
    EventRepository, FinanceRepository, NotificationRepository, PersonRepository,
    WorkflowRepository,
};
pub use rpc::{RpcClient, RpcResponse};
pub use service::DatabaseService;
