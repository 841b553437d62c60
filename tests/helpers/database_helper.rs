//! Test database helper utilities
//!
//! Database-bound tests run against the Postgres pointed at by
//! `TEST_DATABASE_URL` and are `#[ignore]`d by default so the suite passes
//! with no provisioned services. Each test starts from truncated tables.

use sqlx::PgPool;

/// Test database helper that manages Postgres test database setup
pub struct TestDatabase {
    pub pool: PgPool,
}

impl TestDatabase {
    /// Connect to the test database and apply migrations
    pub async fn new() -> Result<Self, sqlx::Error> {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must point at a provisioned Postgres");

        let pool = PgPool::connect(&database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let database = Self { pool };
        database.reset().await?;
        Ok(database)
    }

    /// Truncate every application table for test isolation
    pub async fn reset(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            TRUNCATE auth_events, pin_credentials, approval_workflows, financial_fees,
                     messages, notifications, grades, attendance_records, enrollments,
                     events, class_subjects, classes, course_subjects, subjects, courses,
                     people, congregations, fields
            RESTART IDENTITY CASCADE
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
