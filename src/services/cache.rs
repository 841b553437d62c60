//! Query cache service implementation
//!
//! Redis-backed read-through cache keyed by logical query identifiers.
//! Writes invalidate matching key prefixes; reads are retried a fixed small
//! number of times on recoverable failures, never on authentication-class
//! errors.

use std::future::Future;

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::utils::errors::{EkklesiaError, Result};

/// Fixed retry budget for cache-missed reads
const READ_RETRIES: u32 = 2;

/// Redis service for query caching
#[derive(Clone, Debug)]
pub struct CacheService {
    client: redis::Client,
    settings: Settings,
}

impl CacheService {
    /// Create a new CacheService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = redis::Client::open(settings.redis.url.as_str())?;

        Ok(Self { client, settings })
    }

    /// Get Redis connection
    async fn get_connection(&self) -> Result<redis::aio::Connection> {
        self.client
            .get_async_connection()
            .await
            .map_err(EkklesiaError::Redis)
    }

    /// Set a value with TTL
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.get_connection().await?;
        let serialized = serde_json::to_string(value)?;

        let full_key = format!("{}{}", self.settings.redis.prefix, key);
        let ttl = ttl_seconds.unwrap_or(self.settings.redis.ttl_seconds);

        let _: () = conn.set_ex(&full_key, serialized, ttl).await?;

        debug!(key = %full_key, ttl = ttl, "Value cached");
        Ok(())
    }

    /// Get a cached value
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.settings.redis.prefix, key);

        let result: Option<String> = conn.get(&full_key).await?;

        match result {
            Some(data) => {
                let deserialized = serde_json::from_str::<T>(&data)?;
                debug!(key = %full_key, "Cache hit");
                Ok(Some(deserialized))
            }
            None => {
                debug!(key = %full_key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Delete a cached value
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let full_key = format!("{}{}", self.settings.redis.prefix, key);

        let deleted: i32 = conn.del(&full_key).await?;

        Ok(deleted > 0)
    }

    /// Invalidate every key under a logical prefix (write paths call this
    /// with the table name they touched)
    pub async fn invalidate_prefix(&self, prefix: &str) -> Result<u64> {
        let mut conn = self.get_connection().await?;
        let pattern = format!("{}{}*", self.settings.redis.prefix, prefix);

        let keys: Vec<String> = conn.keys(&pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&keys).await?;
        debug!(pattern = %pattern, deleted = deleted, "Cache prefix invalidated");
        Ok(deleted)
    }

    /// Read-through lookup: serve the cached value when present, otherwise
    /// run the loader (with the fixed retry budget) and cache its result.
    ///
    /// Cache-layer failures degrade to a direct load rather than failing the
    /// read; the loader's own errors are surfaced once retries are spent.
    pub async fn remember<T, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: Option<u64>,
        loader: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => {
                warn!(key = key, error = %e, "Cache read failed, falling through to loader");
            }
        }

        let mut attempt = 0;
        let value = loop {
            match loader().await {
                Ok(value) => break value,
                Err(e) if should_retry(&e, attempt, READ_RETRIES) => {
                    warn!(key = key, attempt = attempt, error = %e, "Read failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        if let Err(e) = self.set(key, &value, ttl_seconds).await {
            warn!(key = key, error = %e, "Failed to cache loaded value");
        }

        Ok(value)
    }

    /// Health check
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

/// Retry only recoverable errors while budget remains. Authentication-class
/// failures are never retried.
fn should_retry(error: &EkklesiaError, attempt: u32, max_retries: u32) -> bool {
    attempt < max_retries && error.is_recoverable()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_recoverable_errors_within_budget() {
        let transient = EkklesiaError::ServiceUnavailable("gateway restarting".to_string());
        assert!(should_retry(&transient, 0, READ_RETRIES));
        assert!(should_retry(&transient, 1, READ_RETRIES));
        assert!(!should_retry(&transient, 2, READ_RETRIES));
    }

    #[test]
    fn never_retries_authentication_class_errors() {
        let auth = EkklesiaError::Authentication("invalid PIN".to_string());
        let denied = EkklesiaError::PermissionDenied("not an administrator".to_string());
        assert!(!should_retry(&auth, 0, READ_RETRIES));
        assert!(!should_retry(&denied, 0, READ_RETRIES));
    }

    #[test]
    fn never_retries_validation_errors() {
        let invalid = EkklesiaError::InvalidInput("malformed CPF".to_string());
        assert!(!should_retry(&invalid, 0, READ_RETRIES));
    }
}
