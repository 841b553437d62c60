//! Notification service implementation
//!
//! In-app notifications and direct messages. Message bodies come from a
//! small template table with `{placeholder}` substitution; the absence sweep
//! and the finance sweep both fan out through this service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::database::repositories::NotificationRepository;
use crate::models::notification::{
    CreateNotificationRequest, Message, Notification, SendMessageRequest,
};
use crate::utils::errors::{EkklesiaError, Result};

/// A notification template: title plus content with `{placeholder}` slots
#[derive(Debug, Clone)]
pub struct NotificationTemplate {
    pub title: String,
    pub content: String,
}

/// Notification service for alerts and direct messages
#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repository: NotificationRepository,
    templates: HashMap<String, NotificationTemplate>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(notification_repository: NotificationRepository) -> Self {
        Self {
            notification_repository,
            templates: Self::load_default_templates(),
        }
    }

    /// Built-in templates
    fn load_default_templates() -> HashMap<String, NotificationTemplate> {
        let mut templates = HashMap::new();

        templates.insert(
            "absence_alert".to_string(),
            NotificationTemplate {
                title: "Alerta de ausência".to_string(),
                content: "{name} está sem atividade há {days} dias.".to_string(),
            },
        );
        templates.insert(
            "fee_overdue".to_string(),
            NotificationTemplate {
                title: "Mensalidade em atraso".to_string(),
                content: "A taxa \"{description}\" de {name} venceu em {due_date}.".to_string(),
            },
        );
        templates.insert(
            "enrollment_approved".to_string(),
            NotificationTemplate {
                title: "Matrícula aprovada".to_string(),
                content: "A matrícula de {name} na turma {class} foi aprovada.".to_string(),
            },
        );

        templates
    }

    /// Render a template with parameters
    pub fn render(
        &self,
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<(String, String)> {
        let template = self.templates.get(template_key).ok_or_else(|| {
            EkklesiaError::InvalidInput(format!("Unknown notification template: {template_key}"))
        })?;

        let mut title = template.title.clone();
        let mut content = template.content.clone();
        for (key, value) in parameters {
            let placeholder = format!("{{{key}}}");
            title = title.replace(&placeholder, value);
            content = content.replace(&placeholder, value);
        }

        Ok((title, content))
    }

    /// Create a notification for one recipient
    pub async fn notify(
        &self,
        recipient_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Notification> {
        debug!(recipient_id = recipient_id, title = %title, "Creating notification");

        self.notification_repository
            .create(CreateNotificationRequest {
                recipient_id,
                title: title.to_string(),
                content: content.to_string(),
            })
            .await
    }

    /// Create a templated notification for each recipient
    pub async fn notify_many(
        &self,
        recipient_ids: &[i64],
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<Vec<Notification>> {
        let (title, content) = self.render(template_key, parameters)?;

        let mut created = Vec::with_capacity(recipient_ids.len());
        for &recipient_id in recipient_ids {
            created.push(self.notify(recipient_id, &title, &content).await?);
        }

        info!(
            template = template_key,
            recipients = created.len(),
            "Notifications fanned out"
        );
        Ok(created)
    }

    /// Notifications of a recipient, newest first
    pub async fn list(&self, recipient_id: i64, limit: i64) -> Result<Vec<Notification>> {
        self.notification_repository
            .list_for_recipient(recipient_id, limit)
            .await
    }

    /// Notifications carrying a title created after the cutoff (sweep
    /// de-duplication window)
    pub async fn recent_by_title(
        &self,
        title: &str,
        created_after: DateTime<Utc>,
    ) -> Result<Vec<Notification>> {
        self.notification_repository
            .list_recent_by_title(title, created_after)
            .await
    }

    /// Count unread notifications
    pub async fn unread_count(&self, recipient_id: i64) -> Result<i64> {
        self.notification_repository
            .count_unread(recipient_id)
            .await
    }

    /// Mark one notification read
    pub async fn mark_read(&self, notification_id: i64) -> Result<()> {
        self.notification_repository.mark_read(notification_id).await
    }

    /// Mark all of a recipient's notifications read
    pub async fn mark_all_read(&self, recipient_id: i64) -> Result<u64> {
        self.notification_repository
            .mark_all_read(recipient_id)
            .await
    }

    /// Send a direct message
    pub async fn send_message(&self, request: SendMessageRequest) -> Result<Message> {
        if request.body.trim().is_empty() {
            return Err(EkklesiaError::InvalidInput(
                "Message body is required".to_string(),
            ));
        }

        self.notification_repository.send_message(request).await
    }

    /// Inbox of a recipient
    pub async fn inbox(&self, recipient_id: i64, limit: i64) -> Result<Vec<Message>> {
        self.notification_repository
            .inbox(recipient_id, limit)
            .await
    }

    /// Mark a direct message read
    pub async fn mark_message_read(&self, message_id: i64) -> Result<()> {
        self.notification_repository
            .mark_message_read(message_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> NotificationService {
        // Only the template table is exercised; the repository is never hit.
        let templates = NotificationService::load_default_templates();
        NotificationService {
            notification_repository: unreachable_repository(),
            templates,
        }
    }

    fn unreachable_repository() -> NotificationRepository {
        NotificationRepository::new(sqlx::postgres::PgPoolOptions::new().connect_lazy("postgresql://localhost/unused").expect("lazy pool"))
    }

    #[tokio::test]
    async fn renders_absence_alert_with_parameters() {
        let service = service();
        let mut params = HashMap::new();
        params.insert("name".to_string(), "Ana Souza".to_string());
        params.insert("days".to_string(), "30".to_string());

        let (title, content) = service.render("absence_alert", &params).unwrap();
        assert_eq!(title, "Alerta de ausência");
        assert_eq!(content, "Ana Souza está sem atividade há 30 dias.");
    }

    #[tokio::test]
    async fn unknown_template_is_rejected() {
        let service = service();
        assert!(service.render("does_not_exist", &HashMap::new()).is_err());
    }

    #[tokio::test]
    async fn unbound_placeholders_are_left_intact() {
        let service = service();
        let (_, content) = service.render("absence_alert", &HashMap::new()).unwrap();
        assert_eq!(content, "{name} está sem atividade há {days} dias.");
    }
}
