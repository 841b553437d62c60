//! Authentication service implementation
//!
//! Sign-in verifies a PIN through the `verify_person_pin` remote procedure
//! (attempt counting and lockout are the procedure's concern) and persists an
//! explicit session object. Loading a session performs the
//! read-once/reconcile step against the people table. Authorization is
//! role-based with a fixed role-to-permission mapping.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::repositories::PersonRepository;
use crate::database::rpc::RpcClient;
use crate::models::person::PersonRole;
use crate::session::{SessionContext, SessionStore};
use crate::utils::errors::{EkklesiaError, Result};

/// Permission levels for administrative operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read own data, browse events
    ViewOwnRecords,
    /// Manage people records
    ManagePeople,
    /// Manage courses, classes, and curriculum
    ManageClasses,
    /// Record attendance and grades
    RecordAttendance,
    /// Manage fees and receipts
    ManageFinance,
    /// Review approval workflows
    ReviewWorkflows,
    /// View dashboard statistics
    ViewDashboard,
    /// Full administrative access
    Administer,
}

/// Fixed mapping from ministry role to permissions
pub fn permissions_for(role: PersonRole) -> HashSet<Permission> {
    let mut permissions = HashSet::new();
    permissions.insert(Permission::ViewOwnRecords);

    match role {
        PersonRole::Administrator => {
            permissions.insert(Permission::ManagePeople);
            permissions.insert(Permission::ManageClasses);
            permissions.insert(Permission::RecordAttendance);
            permissions.insert(Permission::ManageFinance);
            permissions.insert(Permission::ReviewWorkflows);
            permissions.insert(Permission::ViewDashboard);
            permissions.insert(Permission::Administer);
        }
        PersonRole::Pastor => {
            permissions.insert(Permission::ManagePeople);
            permissions.insert(Permission::ReviewWorkflows);
            permissions.insert(Permission::ViewDashboard);
        }
        PersonRole::Coordinator => {
            permissions.insert(Permission::ManageClasses);
            permissions.insert(Permission::RecordAttendance);
            permissions.insert(Permission::ReviewWorkflows);
            permissions.insert(Permission::ViewDashboard);
        }
        PersonRole::Secretary => {
            permissions.insert(Permission::ManagePeople);
            permissions.insert(Permission::ManageFinance);
            permissions.insert(Permission::ViewDashboard);
        }
        PersonRole::Professor => {
            permissions.insert(Permission::RecordAttendance);
        }
        PersonRole::Student | PersonRole::Member => {}
    }

    permissions
}

/// Authentication service for sessions and access control
#[derive(Clone)]
pub struct AuthService {
    person_repository: PersonRepository,
    rpc: RpcClient,
    sessions: SessionStore,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        person_repository: PersonRepository,
        rpc: RpcClient,
        sessions: SessionStore,
    ) -> Self {
        Self {
            person_repository,
            rpc,
            sessions,
        }
    }

    /// Sign a person in with their PIN, establishing a session
    pub async fn sign_in(&self, email: &str, pin: &str) -> Result<SessionContext> {
        debug!(email = %email, "Sign-in attempt");

        let person = self
            .person_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| EkklesiaError::Authentication("Unknown email".to_string()))?;

        if !person.is_active() {
            warn!(person_id = person.id, "Sign-in refused for inactive person");
            return Err(EkklesiaError::Authentication(
                "Account is inactive".to_string(),
            ));
        }

        let response = self
            .rpc
            .call(
                "verify_person_pin",
                serde_json::json!({ "person_id": person.id, "pin": pin }),
            )
            .await?;

        if !response.success {
            let attempts = response.attempts_remaining.unwrap_or(0);
            warn!(person_id = person.id, attempts_remaining = attempts, "PIN verification failed");
            self.log_auth_event(person.id, "pin_rejected").await;
            return Err(EkklesiaError::Authentication(format!(
                "PIN rejected, {attempts} attempt(s) remaining"
            )));
        }

        let context = SessionContext::new(person.id, person.role(), person.congregation_id);
        self.sessions.save(&context).await?;
        self.person_repository
            .touch_last_activity(person.id, Utc::now())
            .await?;
        self.log_auth_event(person.id, "signed_in").await;

        info!(person_id = person.id, role = %context.role, "Person signed in");
        Ok(context)
    }

    /// Load a session and reconcile it against the people table: a missing or
    /// inactive person invalidates the session, and a changed role refreshes
    /// the snapshot.
    pub async fn current_session(&self, person_id: i64) -> Result<SessionContext> {
        let mut context = self
            .sessions
            .load(person_id)
            .await?
            .ok_or(EkklesiaError::SessionExpired)?;

        let person = match self.person_repository.find_by_id(person_id).await? {
            Some(person) if person.is_active() => person,
            _ => {
                warn!(person_id = person_id, "Session subject missing or inactive, invalidating");
                self.sessions.delete(person_id).await?;
                return Err(EkklesiaError::SessionExpired);
            }
        };

        if context.role != person.role() {
            debug!(person_id = person_id, role = %person.role(), "Refreshing role snapshot in session");
            context.role = person.role();
            context.congregation_id = person.congregation_id;
            self.sessions.save(&context).await?;
        }

        Ok(context)
    }

    /// End a session
    pub async fn sign_out(&self, person_id: i64) -> Result<()> {
        self.sessions.delete(person_id).await?;
        self.log_auth_event(person_id, "signed_out").await;

        info!(person_id = person_id, "Person signed out");
        Ok(())
    }

    /// Check whether a session holds a permission
    pub fn has_permission(&self, context: &SessionContext, permission: Permission) -> bool {
        permissions_for(context.role).contains(&permission)
    }

    /// Require a permission or return a descriptive refusal
    pub fn require_permission(
        &self,
        context: &SessionContext,
        permission: Permission,
    ) -> Result<()> {
        if !self.has_permission(context, permission) {
            return Err(EkklesiaError::PermissionDenied(format!(
                "Role {} lacks required permission: {:?}",
                context.role, permission
            )));
        }

        Ok(())
    }

    /// Set a person's PIN through the remote procedure. The PIN shape is
    /// validated before anything is sent.
    pub async fn set_pin(&self, person_id: i64, pin: &str) -> Result<()> {
        validate_pin(pin)?;

        self.rpc
            .call(
                "set_person_pin",
                serde_json::json!({ "person_id": person_id, "pin": pin }),
            )
            .await?
            .into_result()?;

        self.log_auth_event(person_id, "pin_set").await;
        info!(person_id = person_id, "PIN updated");
        Ok(())
    }

    /// Record terms acceptance through the remote procedure
    pub async fn accept_terms(&self, person_id: i64) -> Result<()> {
        self.rpc
            .call("accept_terms", serde_json::json!({ "person_id": person_id }))
            .await?
            .into_result()?;

        info!(person_id = person_id, "Terms accepted");
        Ok(())
    }

    /// Record an authentication event. Best-effort: failures are logged and
    /// swallowed so auditing never blocks the flow itself.
    async fn log_auth_event(&self, person_id: i64, kind: &str) {
        let result = self
            .rpc
            .call(
                "log_auth_event",
                serde_json::json!({ "person_id": person_id, "kind": kind }),
            )
            .await;

        if let Err(e) = result {
            warn!(person_id = person_id, kind = kind, error = %e, "Failed to record auth event");
        }
    }
}

/// A PIN is 4 to 6 digits
fn validate_pin(pin: &str) -> Result<()> {
    let digits_only = pin.chars().all(|c| c.is_ascii_digit());
    if !digits_only || !(4..=6).contains(&pin.len()) {
        return Err(EkklesiaError::InvalidInput(
            "PIN must be 4 to 6 digits".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrators_hold_every_permission() {
        let permissions = permissions_for(PersonRole::Administrator);
        for permission in [
            Permission::ManagePeople,
            Permission::ManageClasses,
            Permission::RecordAttendance,
            Permission::ManageFinance,
            Permission::ReviewWorkflows,
            Permission::ViewDashboard,
            Permission::Administer,
        ] {
            assert!(permissions.contains(&permission), "{permission:?}");
        }
    }

    #[test]
    fn professors_only_record_attendance() {
        let permissions = permissions_for(PersonRole::Professor);
        assert!(permissions.contains(&Permission::RecordAttendance));
        assert!(!permissions.contains(&Permission::ManagePeople));
        assert!(!permissions.contains(&Permission::ManageFinance));
        assert!(!permissions.contains(&Permission::Administer));
    }

    #[test]
    fn members_keep_only_their_own_records() {
        let permissions = permissions_for(PersonRole::Member);
        assert_eq!(
            permissions,
            HashSet::from([Permission::ViewOwnRecords])
        );
    }

    #[test]
    fn pin_shape_is_enforced() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("123456").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("1234567").is_err());
        assert!(validate_pin("12a4").is_err());
    }
}
