//! Remote procedure invocation
//!
//! Named server-side functions are invoked with a JSON parameter bag and
//! return a JSON envelope carrying a `success` flag plus optional structured
//! error and attempt-count fields. The procedure name is validated against a
//! fixed allowlist before being spliced into SQL.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

use crate::utils::errors::{EkklesiaError, Result, RpcError};
use crate::utils::logging;

/// Procedures the backend exposes to this application
const ALLOWED_PROCEDURES: &[&str] = &[
    "set_person_pin",
    "verify_person_pin",
    "accept_terms",
    "attendance_summary",
    "student_average",
    "log_auth_event",
];

/// Result envelope returned by every remote procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub attempts_remaining: Option<i32>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Turn a failed envelope into an error, passing successful ones through
    pub fn into_result(self) -> Result<RpcResponse> {
        if self.success {
            Ok(self)
        } else {
            let reason = self
                .error
                .clone()
                .unwrap_or_else(|| "unspecified failure".to_string());
            Err(EkklesiaError::Rpc(RpcError::CallFailed(reason)))
        }
    }
}

/// Client for named server-side procedures
#[derive(Debug, Clone)]
pub struct RpcClient {
    pool: PgPool,
}

impl RpcClient {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check a procedure name against the allowlist
    pub fn is_known_procedure(procedure: &str) -> bool {
        ALLOWED_PROCEDURES.contains(&procedure)
    }

    /// Invoke a named procedure with a parameter bag
    pub async fn call(
        &self,
        procedure: &str,
        params: serde_json::Value,
    ) -> Result<RpcResponse> {
        if !Self::is_known_procedure(procedure) {
            return Err(EkklesiaError::Rpc(RpcError::UnknownProcedure(
                procedure.to_string(),
            )));
        }

        debug!(procedure = procedure, "Invoking remote procedure");
        let started = std::time::Instant::now();

        // Safe to splice: the name was validated against the fixed allowlist.
        let query = format!("SELECT {procedure}($1::jsonb)");
        let envelope: (serde_json::Value,) = sqlx::query_as(&query)
            .bind(params)
            .fetch_one(&self.pool)
            .await?;

        let response: RpcResponse = serde_json::from_value(envelope.0)
            .map_err(|e| EkklesiaError::Rpc(RpcError::InvalidEnvelope(e.to_string())))?;

        logging::log_rpc_call(
            procedure,
            response.success,
            started.elapsed().as_millis() as u64,
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn allowlist_rejects_unknown_names() {
        assert!(RpcClient::is_known_procedure("verify_person_pin"));
        assert!(!RpcClient::is_known_procedure("drop_table"));
        assert!(!RpcClient::is_known_procedure("verify_person_pin; --"));
    }

    #[test]
    fn failed_envelopes_become_errors() {
        let response = RpcResponse {
            success: false,
            error: Some("PIN mismatch".to_string()),
            attempts_remaining: Some(2),
            data: None,
        };
        assert_matches!(
            response.into_result(),
            Err(EkklesiaError::Rpc(RpcError::CallFailed(reason))) if reason == "PIN mismatch"
        );
    }

    #[test]
    fn envelope_tolerates_missing_optional_fields() {
        let parsed: RpcResponse = serde_json::from_value(serde_json::json!({
            "success": true
        }))
        .unwrap();
        assert!(parsed.success);
        assert!(parsed.error.is_none());
        assert!(parsed.attempts_remaining.is_none());
        assert!(parsed.data.is_none());
    }
}
