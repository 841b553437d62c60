//! Event and attendance repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::event::{
    AttendanceRecord, CreateEventRequest, Event, RecordAttendanceRequest, UpdateEventRequest,
};
use crate::utils::errors::EkklesiaError;

const EVENT_COLUMNS: &str =
    "id, title, description, congregation_id, starts_at, ends_at, location, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, EkklesiaError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, congregation_id, starts_at, ends_at, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, congregation_id, starts_at, ends_at, location, created_at, updated_at
            "#,
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.congregation_id)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EkklesiaError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event, EkklesiaError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                location = COALESCE($6, location),
                updated_at = $7
            WHERE id = $1
            RETURNING id, title, description, congregation_id, starts_at, ends_at, location, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List upcoming events
    pub async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>, EkklesiaError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE starts_at >= NOW() ORDER BY starts_at LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Record attendance for a person in a class session, last write wins
    pub async fn record_attendance(
        &self,
        request: RecordAttendanceRequest,
    ) -> Result<AttendanceRecord, EkklesiaError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance_records (class_id, person_id, session_date, present, note, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (class_id, person_id, session_date)
            DO UPDATE SET present = $4, note = $5
            RETURNING id, class_id, person_id, session_date, present, note, created_at
            "#,
        )
        .bind(request.class_id)
        .bind(request.person_id)
        .bind(request.session_date)
        .bind(request.present)
        .bind(request.note)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// List attendance of a class session
    pub async fn list_attendance_for_session(
        &self,
        class_id: i64,
        session_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, EkklesiaError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, class_id, person_id, session_date, present, note, created_at
            FROM attendance_records
            WHERE class_id = $1 AND session_date = $2
            ORDER BY person_id
            "#,
        )
        .bind(class_id)
        .bind(session_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Count attendance rows referencing a class (class deletion guard)
    pub async fn count_attendance_for_class(&self, class_id: i64) -> Result<i64, EkklesiaError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM attendance_records WHERE class_id = $1")
                .bind(class_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Count attendance rows referencing a person within a class (enrollment
    /// removal guard)
    pub async fn count_attendance_for_person_in_class(
        &self,
        class_id: i64,
        person_id: i64,
    ) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendance_records WHERE class_id = $1 AND person_id = $2",
        )
        .bind(class_id)
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Absences of a person in a class
    pub async fn count_absences(
        &self,
        class_id: i64,
        person_id: i64,
    ) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM attendance_records WHERE class_id = $1 AND person_id = $2 AND present = false",
        )
        .bind(class_id)
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
