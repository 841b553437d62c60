//! Enrollment and grade repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::enrollment::{
    CreateEnrollmentRequest, Enrollment, EnrollmentStatus, Grade, RecordGradeRequest,
};
use crate::utils::errors::EkklesiaError;

const ENROLLMENT_COLUMNS: &str =
    "id, person_id, class_id, course_id, status, enrolled_at, updated_at";

#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new enrollment
    pub async fn create(
        &self,
        request: CreateEnrollmentRequest,
    ) -> Result<Enrollment, EkklesiaError> {
        let status = request.status.unwrap_or(EnrollmentStatus::Pending);
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (person_id, class_id, course_id, status, enrolled_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, person_id, class_id, course_id, status, enrolled_at, updated_at
            "#,
        )
        .bind(request.person_id)
        .bind(request.class_id)
        .bind(request.course_id)
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Find enrollment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Enrollment>, EkklesiaError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Find a person's enrollment in a class with any of the given statuses
    pub async fn find_for_person_in_class(
        &self,
        person_id: i64,
        class_id: i64,
        statuses: &[&str],
    ) -> Result<Option<Enrollment>, EkklesiaError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE person_id = $1 AND class_id = $2 AND status = ANY($3)"
        ))
        .bind(person_id)
        .bind(class_id)
        .bind(statuses.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Set the status of one enrollment
    pub async fn set_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, EkklesiaError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, person_id, class_id, course_id, status, enrolled_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    /// Set the status of every enrollment in the ID list, returning the number
    /// of rows actually updated
    pub async fn set_status_bulk(
        &self,
        ids: &[i64],
        status: EnrollmentStatus,
    ) -> Result<u64, EkklesiaError> {
        let result = sqlx::query(
            "UPDATE enrollments SET status = $2, updated_at = $3 WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete enrollment row (callers must check dependents first)
    pub async fn delete(&self, id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List enrollments of a class
    pub async fn list_by_class(&self, class_id: i64) -> Result<Vec<Enrollment>, EkklesiaError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE class_id = $1 ORDER BY enrolled_at"
        ))
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    /// List enrollments of a person
    pub async fn list_by_person(&self, person_id: i64) -> Result<Vec<Enrollment>, EkklesiaError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE person_id = $1 ORDER BY enrolled_at"
        ))
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    /// Count enrollments of a class holding a given status
    pub async fn count_by_class_and_status(
        &self,
        class_id: i64,
        status: EnrollmentStatus,
    ) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM enrollments WHERE class_id = $1 AND status = $2",
        )
        .bind(class_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Count status tallies per status string across all enrollments
    pub async fn count_by_status(&self, status: EnrollmentStatus) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Record a grade against an enrollment
    pub async fn record_grade(&self, request: RecordGradeRequest) -> Result<Grade, EkklesiaError> {
        let grade = sqlx::query_as::<_, Grade>(
            r#"
            INSERT INTO grades (enrollment_id, subject_id, score, recorded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, enrollment_id, subject_id, score, recorded_at
            "#,
        )
        .bind(request.enrollment_id)
        .bind(request.subject_id)
        .bind(request.score)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(grade)
    }

    /// List grades of an enrollment
    pub async fn list_grades(&self, enrollment_id: i64) -> Result<Vec<Grade>, EkklesiaError> {
        let grades = sqlx::query_as::<_, Grade>(
            "SELECT id, enrollment_id, subject_id, score, recorded_at FROM grades WHERE enrollment_id = $1 ORDER BY recorded_at",
        )
        .bind(enrollment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(grades)
    }

    /// Count grades recorded against an enrollment
    pub async fn count_grades(&self, enrollment_id: i64) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM grades WHERE enrollment_id = $1")
            .bind(enrollment_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
