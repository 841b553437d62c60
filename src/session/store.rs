//! Session storage implementation
//!
//! This module handles persistence of session state using Redis under fixed
//! keys, including serialization, expiration, and cleanup.

use redis::AsyncCommands;
use tracing::{debug, error, warn};

use crate::config::SessionConfig;
use crate::utils::errors::Result;

use super::context::SessionContext;

/// Redis-based session storage
#[derive(Clone)]
pub struct SessionStore {
    connection_manager: redis::aio::ConnectionManager,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new session store
    pub async fn new(redis_url: &str, config: SessionConfig) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save a session context
    pub async fn save(&self, context: &SessionContext) -> Result<()> {
        let key = self.session_key(context.person_id);
        debug!(person_id = context.person_id, key = %key, "Saving session");

        let serialized = serde_json::to_string(context)?;

        let ttl_seconds = if let Some(expires_at) = context.expires_at {
            let remaining = expires_at - chrono::Utc::now();
            std::cmp::max(remaining.num_seconds(), 60) as u64
        } else {
            self.config.ttl_seconds
        };

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(person_id = context.person_id, ttl_seconds = ttl_seconds, "Session saved");
                Ok(())
            }
            Err(e) => {
                error!(person_id = context.person_id, error = %e, "Failed to save session");
                Err(e.into())
            }
        }
    }

    /// Load a session context, dropping it when already expired
    pub async fn load(&self, person_id: i64) -> Result<Option<SessionContext>> {
        let key = self.session_key(person_id);
        debug!(person_id = person_id, key = %key, "Loading session");

        let mut conn = self.connection_manager.clone();
        let serialized: Option<String> = conn.get(&key).await?;

        match serialized {
            Some(data) => {
                let context: SessionContext = serde_json::from_str(&data)?;

                if context.is_expired() {
                    warn!(person_id = person_id, expires_at = ?context.expires_at, "Session expired, removing");
                    self.delete(person_id).await?;
                    return Ok(None);
                }

                debug!(person_id = person_id, role = %context.role, "Session loaded");
                Ok(Some(context))
            }
            None => {
                debug!(person_id = person_id, "No session found");
                Ok(None)
            }
        }
    }

    /// Delete a session
    pub async fn delete(&self, person_id: i64) -> Result<()> {
        let key = self.session_key(person_id);
        let mut conn = self.connection_manager.clone();
        let _: i32 = conn.del(&key).await?;

        debug!(person_id = person_id, "Session deleted");
        Ok(())
    }

    fn session_key(&self, person_id: i64) -> String {
        format!("{}{}", self.config.key_prefix, person_id)
    }
}
