//! Financial fee repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::finance::{CreateFeeRequest, FeeStatus, FinancialFee};
use crate::utils::errors::EkklesiaError;

const FEE_COLUMNS: &str = "id, person_id, description, amount_cents, due_date, status, paid_at, receipt_number, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new fee
    pub async fn create(&self, request: CreateFeeRequest) -> Result<FinancialFee, EkklesiaError> {
        let fee = sqlx::query_as::<_, FinancialFee>(
            r#"
            INSERT INTO financial_fees (person_id, description, amount_cents, due_date, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6)
            RETURNING id, person_id, description, amount_cents, due_date, status, paid_at, receipt_number, created_at, updated_at
            "#,
        )
        .bind(request.person_id)
        .bind(request.description)
        .bind(request.amount_cents)
        .bind(request.due_date)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(fee)
    }

    /// Find fee by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<FinancialFee>, EkklesiaError> {
        let fee = sqlx::query_as::<_, FinancialFee>(&format!(
            "SELECT {FEE_COLUMNS} FROM financial_fees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fee)
    }

    /// Mark a fee paid, stamping payment time and receipt number
    pub async fn mark_paid(
        &self,
        id: i64,
        receipt_number: &str,
    ) -> Result<FinancialFee, EkklesiaError> {
        let fee = sqlx::query_as::<_, FinancialFee>(
            r#"
            UPDATE financial_fees
            SET status = 'paid', paid_at = $2, receipt_number = $3, updated_at = $2
            WHERE id = $1
            RETURNING id, person_id, description, amount_cents, due_date, status, paid_at, receipt_number, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(receipt_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(fee)
    }

    /// Set a fee status
    pub async fn set_status(
        &self,
        id: i64,
        status: FeeStatus,
    ) -> Result<FinancialFee, EkklesiaError> {
        let fee = sqlx::query_as::<_, FinancialFee>(
            r#"
            UPDATE financial_fees
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, person_id, description, amount_cents, due_date, status, paid_at, receipt_number, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(fee)
    }

    /// Flip pending fees past their due date to overdue, returning the number
    /// of rows updated
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, EkklesiaError> {
        let result = sqlx::query(
            "UPDATE financial_fees SET status = 'overdue', updated_at = $2 WHERE status = 'pending' AND due_date < $1",
        )
        .bind(today)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List fees of a person
    pub async fn list_by_person(&self, person_id: i64) -> Result<Vec<FinancialFee>, EkklesiaError> {
        let fees = sqlx::query_as::<_, FinancialFee>(&format!(
            "SELECT {FEE_COLUMNS} FROM financial_fees WHERE person_id = $1 ORDER BY due_date DESC"
        ))
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fees)
    }

    /// List fees holding a status
    pub async fn list_by_status(&self, status: FeeStatus) -> Result<Vec<FinancialFee>, EkklesiaError> {
        let fees = sqlx::query_as::<_, FinancialFee>(&format!(
            "SELECT {FEE_COLUMNS} FROM financial_fees WHERE status = $1 ORDER BY due_date"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(fees)
    }

    /// Outstanding (pending + overdue) total of a person, in cents
    pub async fn outstanding_cents(&self, person_id: i64) -> Result<i64, EkklesiaError> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM financial_fees WHERE person_id = $1 AND status IN ('pending', 'overdue')",
        )
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.0)
    }
}
