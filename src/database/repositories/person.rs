//! Person repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::person::{CreatePersonRequest, Person, PersonStatus, UpdatePersonRequest};
use crate::utils::errors::EkklesiaError;

const PERSON_COLUMNS: &str = "id, full_name, email, phone, cpf, role, status, congregation_id, last_activity_at, terms_accepted_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new person
    pub async fn create(&self, request: CreatePersonRequest) -> Result<Person, EkklesiaError> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (full_name, email, phone, cpf, role, status, congregation_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, $8)
            RETURNING id, full_name, email, phone, cpf, role, status, congregation_id, last_activity_at, terms_accepted_at, created_at, updated_at
            "#,
        )
        .bind(request.full_name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.cpf)
        .bind(request.role.as_str())
        .bind(request.congregation_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    /// Find person by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Person>, EkklesiaError> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    /// Find person by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Person>, EkklesiaError> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    /// Update person
    pub async fn update(
        &self,
        id: i64,
        request: UpdatePersonRequest,
    ) -> Result<Person, EkklesiaError> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE people
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                cpf = COALESCE($5, cpf),
                role = COALESCE($6, role),
                congregation_id = COALESCE($7, congregation_id),
                updated_at = $8
            WHERE id = $1
            RETURNING id, full_name, email, phone, cpf, role, status, congregation_id, last_activity_at, terms_accepted_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.full_name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.cpf)
        .bind(request.role.map(|r| r.as_str().to_string()))
        .bind(request.congregation_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    /// Flag person status (people are never hard-deleted by lifecycle logic)
    pub async fn set_status(
        &self,
        id: i64,
        status: PersonStatus,
    ) -> Result<Person, EkklesiaError> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE people
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, full_name, email, phone, cpf, role, status, congregation_id, last_activity_at, terms_accepted_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    /// Record activity (heuristic absence signal, no dedicated ledger)
    pub async fn touch_last_activity(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<(), EkklesiaError> {
        sqlx::query("UPDATE people SET last_activity_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List people with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Person>, EkklesiaError> {
        let people = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people ORDER BY full_name LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// List all active people (absence sweep input)
    pub async fn list_active(&self) -> Result<Vec<Person>, EkklesiaError> {
        let people = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE status = 'active' ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// List active people holding any of the given roles
    pub async fn list_active_by_roles(
        &self,
        roles: &[&str],
    ) -> Result<Vec<Person>, EkklesiaError> {
        let people = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE status = 'active' AND role = ANY($1) ORDER BY id"
        ))
        .bind(roles.iter().map(|r| r.to_string()).collect::<Vec<_>>())
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// Find people by name pattern
    pub async fn find_by_name_pattern(&self, pattern: &str) -> Result<Vec<Person>, EkklesiaError> {
        let people = sqlx::query_as::<_, Person>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE full_name ILIKE $1 ORDER BY full_name"
        ))
        .bind(format!("%{}%", pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// Count all people
    pub async fn count(&self) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM people")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count people per role
    pub async fn count_by_role(&self, role: &str) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM people WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count people per status
    pub async fn count_by_status(&self, status: &str) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM people WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
