//! Course, subject, and curriculum repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::course::{
    ClassSubject, Course, CourseSubject, CreateCourseRequest, CreateSubjectRequest, Subject,
    UpdateCourseRequest,
};
use crate::utils::errors::EkklesiaError;

#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new course
    pub async fn create(&self, request: CreateCourseRequest) -> Result<Course, EkklesiaError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, workload_hours, active, created_at, updated_at)
            VALUES ($1, $2, $3, true, $4, $5)
            RETURNING id, title, description, workload_hours, active, created_at, updated_at
            "#,
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.workload_hours)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// Find course by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Course>, EkklesiaError> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, workload_hours, active, created_at, updated_at FROM courses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// Update course
    pub async fn update(
        &self,
        id: i64,
        request: UpdateCourseRequest,
    ) -> Result<Course, EkklesiaError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                workload_hours = COALESCE($4, workload_hours),
                active = COALESCE($5, active),
                updated_at = $6
            WHERE id = $1
            RETURNING id, title, description, workload_hours, active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.workload_hours)
        .bind(request.active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// List all courses
    pub async fn list(&self) -> Result<Vec<Course>, EkklesiaError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, workload_hours, active, created_at, updated_at FROM courses ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// Create a new subject
    pub async fn create_subject(
        &self,
        request: CreateSubjectRequest,
    ) -> Result<Subject, EkklesiaError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (title, description) VALUES ($1, $2) RETURNING id, title, description",
        )
        .bind(request.title)
        .bind(request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    /// List all subjects
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, EkklesiaError> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, title, description FROM subjects ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    /// Attach a subject to a course curriculum at a position
    pub async fn attach_subject(
        &self,
        course_id: i64,
        subject_id: i64,
        position: i32,
    ) -> Result<CourseSubject, EkklesiaError> {
        let link = sqlx::query_as::<_, CourseSubject>(
            r#"
            INSERT INTO course_subjects (course_id, subject_id, position)
            VALUES ($1, $2, $3)
            ON CONFLICT (course_id, subject_id) DO UPDATE SET position = $3
            RETURNING course_id, subject_id, position
            "#,
        )
        .bind(course_id)
        .bind(subject_id)
        .bind(position)
        .fetch_one(&self.pool)
        .await?;

        Ok(link)
    }

    /// Detach a subject from a course curriculum
    pub async fn detach_subject(&self, course_id: i64, subject_id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("DELETE FROM course_subjects WHERE course_id = $1 AND subject_id = $2")
            .bind(course_id)
            .bind(subject_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Curriculum of a course, joined with subjects, in position order
    pub async fn curriculum(&self, course_id: i64) -> Result<Vec<Subject>, EkklesiaError> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT s.id, s.title, s.description
            FROM subjects s
            JOIN course_subjects cs ON cs.subject_id = s.id
            WHERE cs.course_id = $1
            ORDER BY cs.position
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    /// Assign a subject (and optional professor) to a class
    pub async fn assign_class_subject(
        &self,
        class_id: i64,
        subject_id: i64,
        professor_id: Option<i64>,
    ) -> Result<ClassSubject, EkklesiaError> {
        let link = sqlx::query_as::<_, ClassSubject>(
            r#"
            INSERT INTO class_subjects (class_id, subject_id, professor_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (class_id, subject_id) DO UPDATE SET professor_id = $3
            RETURNING class_id, subject_id, professor_id
            "#,
        )
        .bind(class_id)
        .bind(subject_id)
        .bind(professor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(link)
    }

    /// Subjects taught in a class
    pub async fn class_subjects(&self, class_id: i64) -> Result<Vec<ClassSubject>, EkklesiaError> {
        let links = sqlx::query_as::<_, ClassSubject>(
            "SELECT class_id, subject_id, professor_id FROM class_subjects WHERE class_id = $1",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }
}
