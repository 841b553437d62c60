//! Approval workflow repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::workflow::{ApprovalWorkflow, SubmitWorkflowRequest, WorkflowStatus};
use crate::utils::errors::EkklesiaError;

const WORKFLOW_COLUMNS: &str =
    "id, requester_id, kind, payload, status, reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    pool: PgPool,
}

impl WorkflowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit a new approval request
    pub async fn submit(
        &self,
        request: SubmitWorkflowRequest,
    ) -> Result<ApprovalWorkflow, EkklesiaError> {
        let workflow = sqlx::query_as::<_, ApprovalWorkflow>(
            r#"
            INSERT INTO approval_workflows (requester_id, kind, payload, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING id, requester_id, kind, payload, status, reviewed_by, reviewed_at, created_at, updated_at
            "#,
        )
        .bind(request.requester_id)
        .bind(request.kind)
        .bind(request.payload)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(workflow)
    }

    /// Find workflow by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ApprovalWorkflow>, EkklesiaError> {
        let workflow = sqlx::query_as::<_, ApprovalWorkflow>(&format!(
            "SELECT {WORKFLOW_COLUMNS} FROM approval_workflows WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workflow)
    }

    /// Resolve a workflow, stamping the reviewer
    pub async fn resolve(
        &self,
        id: i64,
        status: WorkflowStatus,
        reviewed_by: i64,
    ) -> Result<ApprovalWorkflow, EkklesiaError> {
        let workflow = sqlx::query_as::<_, ApprovalWorkflow>(
            r#"
            UPDATE approval_workflows
            SET status = $2, reviewed_by = $3, reviewed_at = $4, updated_at = $4
            WHERE id = $1
            RETURNING id, requester_id, kind, payload, status, reviewed_by, reviewed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(reviewed_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(workflow)
    }

    /// List pending workflows, oldest first
    pub async fn list_pending(&self) -> Result<Vec<ApprovalWorkflow>, EkklesiaError> {
        let workflows = sqlx::query_as::<_, ApprovalWorkflow>(&format!(
            "SELECT {WORKFLOW_COLUMNS} FROM approval_workflows WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(workflows)
    }
}
