//! Class repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::class::{Class, ClassStatus, CreateClassRequest, UpdateClassRequest};
use crate::models::enrollment::RosterEntry;
use crate::utils::errors::EkklesiaError;

const CLASS_COLUMNS: &str = "id, course_id, congregation_id, name, professor_id, starts_on, ends_on, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ClassRepository {
    pool: PgPool,
}

impl ClassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new class
    pub async fn create(&self, request: CreateClassRequest) -> Result<Class, EkklesiaError> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (course_id, congregation_id, name, professor_id, starts_on, ends_on, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'active', $7, $8)
            RETURNING id, course_id, congregation_id, name, professor_id, starts_on, ends_on, status, created_at, updated_at
            "#,
        )
        .bind(request.course_id)
        .bind(request.congregation_id)
        .bind(request.name)
        .bind(request.professor_id)
        .bind(request.starts_on)
        .bind(request.ends_on)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    /// Find class by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Class>, EkklesiaError> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    /// Update class
    pub async fn update(
        &self,
        id: i64,
        request: UpdateClassRequest,
    ) -> Result<Class, EkklesiaError> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes
            SET name = COALESCE($2, name),
                congregation_id = COALESCE($3, congregation_id),
                professor_id = COALESCE($4, professor_id),
                starts_on = COALESCE($5, starts_on),
                ends_on = COALESCE($6, ends_on),
                updated_at = $7
            WHERE id = $1
            RETURNING id, course_id, congregation_id, name, professor_id, starts_on, ends_on, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.congregation_id)
        .bind(request.professor_id)
        .bind(request.starts_on)
        .bind(request.ends_on)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    /// Flag class status
    pub async fn set_status(&self, id: i64, status: ClassStatus) -> Result<Class, EkklesiaError> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, course_id, congregation_id, name, professor_id, starts_on, ends_on, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    /// Delete class row (callers must check dependents first)
    pub async fn delete(&self, id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List classes of a course
    pub async fn list_by_course(&self, course_id: i64) -> Result<Vec<Class>, EkklesiaError> {
        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE course_id = $1 ORDER BY name"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// List classes of a congregation
    pub async fn list_by_congregation(
        &self,
        congregation_id: i64,
    ) -> Result<Vec<Class>, EkklesiaError> {
        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE congregation_id = $1 ORDER BY name"
        ))
        .bind(congregation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// Class roster: enrollments joined with people
    pub async fn roster(&self, class_id: i64) -> Result<Vec<RosterEntry>, EkklesiaError> {
        let roster = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT e.id AS enrollment_id, p.id AS person_id, p.full_name, e.status, e.enrolled_at
            FROM enrollments e
            JOIN people p ON p.id = e.person_id
            WHERE e.class_id = $1
            ORDER BY p.full_name
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roster)
    }
}
