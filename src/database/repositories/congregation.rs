//! Congregation and field repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::congregation::{
    Congregation, CreateCongregationRequest, CreateFieldRequest, Field, UpdateCongregationRequest,
};
use crate::utils::errors::EkklesiaError;

#[derive(Debug, Clone)]
pub struct CongregationRepository {
    pool: PgPool,
}

impl CongregationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new congregation
    pub async fn create(
        &self,
        request: CreateCongregationRequest,
    ) -> Result<Congregation, EkklesiaError> {
        let congregation = sqlx::query_as::<_, Congregation>(
            r#"
            INSERT INTO congregations (name, field_id, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, field_id, address, created_at, updated_at
            "#,
        )
        .bind(request.name)
        .bind(request.field_id)
        .bind(request.address)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(congregation)
    }

    /// Find congregation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Congregation>, EkklesiaError> {
        let congregation = sqlx::query_as::<_, Congregation>(
            "SELECT id, name, field_id, address, created_at, updated_at FROM congregations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(congregation)
    }

    /// Update congregation
    pub async fn update(
        &self,
        id: i64,
        request: UpdateCongregationRequest,
    ) -> Result<Congregation, EkklesiaError> {
        let congregation = sqlx::query_as::<_, Congregation>(
            r#"
            UPDATE congregations
            SET name = COALESCE($2, name),
                field_id = COALESCE($3, field_id),
                address = COALESCE($4, address),
                updated_at = $5
            WHERE id = $1
            RETURNING id, name, field_id, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.field_id)
        .bind(request.address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(congregation)
    }

    /// Delete congregation
    pub async fn delete(&self, id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("DELETE FROM congregations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all congregations
    pub async fn list(&self) -> Result<Vec<Congregation>, EkklesiaError> {
        let congregations = sqlx::query_as::<_, Congregation>(
            "SELECT id, name, field_id, address, created_at, updated_at FROM congregations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(congregations)
    }

    /// List congregations belonging to a field
    pub async fn list_by_field(&self, field_id: i64) -> Result<Vec<Congregation>, EkklesiaError> {
        let congregations = sqlx::query_as::<_, Congregation>(
            "SELECT id, name, field_id, address, created_at, updated_at FROM congregations WHERE field_id = $1 ORDER BY name",
        )
        .bind(field_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(congregations)
    }

    /// Create a new regional field
    pub async fn create_field(&self, request: CreateFieldRequest) -> Result<Field, EkklesiaError> {
        let field = sqlx::query_as::<_, Field>(
            "INSERT INTO fields (name, region) VALUES ($1, $2) RETURNING id, name, region",
        )
        .bind(request.name)
        .bind(request.region)
        .fetch_one(&self.pool)
        .await?;

        Ok(field)
    }

    /// List all regional fields
    pub async fn list_fields(&self) -> Result<Vec<Field>, EkklesiaError> {
        let fields =
            sqlx::query_as::<_, Field>("SELECT id, name, region FROM fields ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(fields)
    }
}
