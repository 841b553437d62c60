//! Session context
//!
//! An explicit session object replaces ad hoc client-local storage: the
//! logged-in user is reconstructed from the store at startup and reconciled
//! against the people table before use.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PersonRole;

/// Persisted session state for one signed-in person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Person this session belongs to
    pub person_id: i64,
    /// Role snapshot taken at sign-in, refreshed on reconcile
    pub role: PersonRole,
    /// Congregation scope, when the person belongs to one
    pub congregation_id: Option<i64>,
    /// When the session was established
    pub authenticated_at: DateTime<Utc>,
    /// When this session expires
    pub expires_at: Option<DateTime<Utc>>,
    /// Free-form session data
    pub data: HashMap<String, serde_json::Value>,
}

impl SessionContext {
    /// Create a new session for a person
    pub fn new(person_id: i64, role: PersonRole, congregation_id: Option<i64>) -> Self {
        Self {
            person_id,
            role,
            congregation_id,
            authenticated_at: Utc::now(),
            expires_at: Some(Utc::now() + Duration::hours(24)),
            data: HashMap::new(),
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    /// Store a session data value
    pub fn set_data(&mut self, key: &str, value: serde_json::Value) {
        self.data.insert(key.to_string(), value);
    }

    /// Read a session data value
    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_sessions_are_not_expired() {
        let context = SessionContext::new(1, PersonRole::Secretary, Some(4));
        assert!(!context.is_expired());
        assert_eq!(context.congregation_id, Some(4));
    }

    #[test]
    fn past_expiry_marks_session_expired() {
        let mut context = SessionContext::new(1, PersonRole::Member, None);
        context.expires_at = Some(Utc::now() - Duration::minutes(5));
        assert!(context.is_expired());
    }

    #[test]
    fn session_data_round_trips() {
        let mut context = SessionContext::new(9, PersonRole::Professor, None);
        context.set_data("theme", serde_json::json!("dark"));
        assert_eq!(
            context.get_data("theme"),
            Some(&serde_json::json!("dark"))
        );
        assert!(context.get_data("missing").is_none());
    }
}
