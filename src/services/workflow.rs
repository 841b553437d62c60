//! Approval workflow service implementation
//!
//! Registration, transfer, and role-change requests travel as payload bags
//! through a pending/approved/rejected lifecycle with reviewer stamping.

use tracing::info;

use crate::database::repositories::WorkflowRepository;
use crate::models::workflow::{ApprovalWorkflow, SubmitWorkflowRequest, WorkflowStatus};
use crate::utils::errors::{EkklesiaError, Result};

/// Workflow service for approval requests
#[derive(Debug, Clone)]
pub struct WorkflowService {
    workflow_repository: WorkflowRepository,
}

impl WorkflowService {
    /// Create a new WorkflowService instance
    pub fn new(workflow_repository: WorkflowRepository) -> Self {
        Self {
            workflow_repository,
        }
    }

    /// Submit an approval request
    pub async fn submit(&self, request: SubmitWorkflowRequest) -> Result<ApprovalWorkflow> {
        if request.kind.trim().is_empty() {
            return Err(EkklesiaError::InvalidInput(
                "Workflow kind is required".to_string(),
            ));
        }
        if !request.payload.is_object() {
            return Err(EkklesiaError::InvalidInput(
                "Workflow payload must be an object".to_string(),
            ));
        }

        let workflow = self.workflow_repository.submit(request).await?;
        info!(workflow_id = workflow.id, kind = %workflow.kind, "Workflow submitted");

        Ok(workflow)
    }

    /// Approve a pending workflow
    pub async fn approve(&self, workflow_id: i64, reviewer_id: i64) -> Result<ApprovalWorkflow> {
        self.resolve(workflow_id, reviewer_id, WorkflowStatus::Approved)
            .await
    }

    /// Reject a pending workflow
    pub async fn reject(&self, workflow_id: i64, reviewer_id: i64) -> Result<ApprovalWorkflow> {
        self.resolve(workflow_id, reviewer_id, WorkflowStatus::Rejected)
            .await
    }

    async fn resolve(
        &self,
        workflow_id: i64,
        reviewer_id: i64,
        status: WorkflowStatus,
    ) -> Result<ApprovalWorkflow> {
        let existing = self
            .workflow_repository
            .find_by_id(workflow_id)
            .await?
            .ok_or_else(|| {
                EkklesiaError::InvalidInput(format!("Workflow {workflow_id} does not exist"))
            })?;

        if existing.status != WorkflowStatus::Pending.as_str() {
            return Err(EkklesiaError::BusinessRule(format!(
                "Workflow {} was already resolved as {}",
                existing.id, existing.status
            )));
        }

        let workflow = self
            .workflow_repository
            .resolve(existing.id, status, reviewer_id)
            .await?;

        info!(
            workflow_id = workflow_id,
            reviewer_id = reviewer_id,
            status = %status,
            "Workflow resolved"
        );
        Ok(workflow)
    }

    /// List pending workflows, oldest first
    pub async fn list_pending(&self) -> Result<Vec<ApprovalWorkflow>> {
        self.workflow_repository.list_pending().await
    }
}
