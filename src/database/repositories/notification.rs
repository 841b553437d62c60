//! Notification and message repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::notification::{
    CreateNotificationRequest, Message, Notification, SendMessageRequest,
};
use crate::utils::errors::EkklesiaError;

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new notification
    pub async fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification, EkklesiaError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (recipient_id, title, content, read, created_at)
            VALUES ($1, $2, $3, false, $4)
            RETURNING id, recipient_id, title, content, read, created_at
            "#,
        )
        .bind(request.recipient_id)
        .bind(request.title)
        .bind(request.content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// List notifications of a recipient, newest first
    pub async fn list_for_recipient(
        &self,
        recipient_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, EkklesiaError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, recipient_id, title, content, read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(recipient_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Notifications with a given title created after a cutoff, used by the
    /// absence sweep de-duplication window
    pub async fn list_recent_by_title(
        &self,
        title: &str,
        created_after: DateTime<Utc>,
    ) -> Result<Vec<Notification>, EkklesiaError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, recipient_id, title, content, read, created_at
            FROM notifications
            WHERE title = $1 AND created_at >= $2
            "#,
        )
        .bind(title)
        .bind(created_after)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Count unread notifications of a recipient
    pub async fn count_unread(&self, recipient_id: i64) -> Result<i64, EkklesiaError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND read = false",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Mark one notification read
    pub async fn mark_read(&self, id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("UPDATE notifications SET read = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Mark every notification of a recipient read
    pub async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, EkklesiaError> {
        let result =
            sqlx::query("UPDATE notifications SET read = true WHERE recipient_id = $1 AND read = false")
                .bind(recipient_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Send a direct message
    pub async fn send_message(&self, request: SendMessageRequest) -> Result<Message, EkklesiaError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, subject, body, read, sent_at)
            VALUES ($1, $2, $3, $4, false, $5)
            RETURNING id, sender_id, recipient_id, subject, body, read, sent_at
            "#,
        )
        .bind(request.sender_id)
        .bind(request.recipient_id)
        .bind(request.subject)
        .bind(request.body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Inbox of a recipient, newest first
    pub async fn inbox(&self, recipient_id: i64, limit: i64) -> Result<Vec<Message>, EkklesiaError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, subject, body, read, sent_at
            FROM messages
            WHERE recipient_id = $1
            ORDER BY sent_at DESC
            LIMIT $2
            "#,
        )
        .bind(recipient_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Mark one message read
    pub async fn mark_message_read(&self, id: i64) -> Result<(), EkklesiaError> {
        sqlx::query("UPDATE messages SET read = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
