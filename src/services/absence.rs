//! Absence sweep service implementation
//!
//! Periodic scan over active people flagging those whose last activity is
//! exactly 30, 60, or 90 days old and alerting administrators and
//! coordinators. De-duplication is a title+content substring match over the
//! last 24 hours — best-effort, with no locking: concurrent sweeps can still
//! double-insert.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SweepConfig;
use crate::database::repositories::PersonRepository;
use crate::models::notification::Notification;
use crate::models::person::{Person, PersonRole};
use crate::services::notification::NotificationService;
use crate::utils::errors::Result;
use crate::utils::helpers;
use crate::utils::logging;

/// Absence day counts that trigger an alert
pub const ABSENCE_MILESTONES: &[i64] = &[30, 60, 90];

/// Template key used for absence alerts
const ABSENCE_TEMPLATE: &str = "absence_alert";

/// Outcome of one sweep run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub flagged: usize,
    pub notifications_created: usize,
    pub duplicates_skipped: usize,
}

/// Absence sweep service
#[derive(Debug, Clone)]
pub struct AbsenceService {
    person_repository: PersonRepository,
    notification_service: NotificationService,
    config: SweepConfig,
}

impl AbsenceService {
    /// Create a new AbsenceService instance
    pub fn new(
        person_repository: PersonRepository,
        notification_service: NotificationService,
        config: SweepConfig,
    ) -> Self {
        Self {
            person_repository,
            notification_service,
            config,
        }
    }

    /// Run one sweep over all active people
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let started = std::time::Instant::now();
        let mut report = SweepReport::default();

        let people = self.person_repository.list_active().await?;
        report.scanned = people.len();

        let recipients: Vec<i64> = self
            .person_repository
            .list_active_by_roles(&[
                PersonRole::Administrator.as_str(),
                PersonRole::Coordinator.as_str(),
            ])
            .await?
            .into_iter()
            .map(|person| person.id)
            .collect();

        if recipients.is_empty() {
            debug!("No administrators or coordinators to alert, skipping sweep");
            return Ok(report);
        }

        let alert_title = self.alert_title()?;
        let window_start = now - Duration::hours(self.config.notification_window_hours);
        let recent = self
            .notification_service
            .recent_by_title(&alert_title, window_start)
            .await?;

        for person in &people {
            let Some(days) = absence_milestone(person, now) else {
                continue;
            };
            report.flagged += 1;

            let needle = alert_needle(&person.full_name, days);
            if is_recent_duplicate(&recent, &needle) {
                debug!(person_id = person.id, days = days, "Alert already sent in window, skipping");
                report.duplicates_skipped += 1;
                continue;
            }

            let mut parameters = HashMap::new();
            parameters.insert("name".to_string(), person.full_name.clone());
            parameters.insert("days".to_string(), days.to_string());

            let created = self
                .notification_service
                .notify_many(&recipients, ABSENCE_TEMPLATE, &parameters)
                .await?;
            report.notifications_created += created.len();

            info!(
                person_id = person.id,
                days = days,
                recipients = recipients.len(),
                "Absence alert created"
            );
        }

        logging::log_sweep_run(
            "absence",
            report.scanned,
            report.notifications_created,
            started.elapsed().as_millis() as u64,
        );
        Ok(report)
    }

    /// Title the sweep de-duplication window matches against
    fn alert_title(&self) -> Result<String> {
        let (title, _) = self
            .notification_service
            .render(ABSENCE_TEMPLATE, &HashMap::new())?;
        Ok(title)
    }
}

/// The milestone a person sits on today, if any. People without a recorded
/// activity timestamp are never flagged.
pub fn absence_milestone(person: &Person, now: DateTime<Utc>) -> Option<i64> {
    let last_activity = person.last_activity_at?;
    let days = helpers::days_since(last_activity, now);
    ABSENCE_MILESTONES.contains(&days).then_some(days)
}

/// Content substring used to recognize an alert already sent for this person
/// and milestone
pub fn alert_needle(full_name: &str, days: i64) -> String {
    format!("{full_name} está sem atividade há {days} dias")
}

/// Fragile by design: duplicate recognition is a substring match over the
/// recent notification window, not a structured idempotency key.
pub fn is_recent_duplicate(recent: &[Notification], needle: &str) -> bool {
    recent.iter().any(|n| n.content.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn person_with_last_activity(days_ago: i64, extra_hours: i64) -> Person {
        let now = sweep_now();
        Person {
            id: 1,
            full_name: "Ana Souza".to_string(),
            email: None,
            phone: None,
            cpf: None,
            role: "member".to_string(),
            status: "active".to_string(),
            congregation_id: None,
            last_activity_at: Some(now - Duration::days(days_ago) - Duration::hours(extra_hours)),
            terms_accepted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sweep_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fires_on_exact_milestones() {
        for days in [30, 60, 90] {
            let person = person_with_last_activity(days, 0);
            assert_eq!(absence_milestone(&person, sweep_now()), Some(days));
        }
    }

    #[test]
    fn stays_silent_off_milestones() {
        for days in [0, 1, 29, 31, 59, 61, 89, 91, 365] {
            let person = person_with_last_activity(days, 0);
            assert_eq!(absence_milestone(&person, sweep_now()), None, "day {days}");
        }
    }

    #[test]
    fn partial_days_floor_onto_the_milestone() {
        // 30 days and 11 hours ago still counts as day 30.
        let person = person_with_last_activity(30, 11);
        assert_eq!(absence_milestone(&person, sweep_now()), Some(30));
    }

    #[test]
    fn people_without_activity_are_never_flagged() {
        let mut person = person_with_last_activity(30, 0);
        person.last_activity_at = None;
        assert_eq!(absence_milestone(&person, sweep_now()), None);
    }

    #[test]
    fn duplicate_window_matches_on_content_substring() {
        let existing = vec![Notification {
            id: 1,
            recipient_id: 7,
            title: "Alerta de ausência".to_string(),
            content: "Ana Souza está sem atividade há 30 dias.".to_string(),
            read: false,
            created_at: sweep_now(),
        }];

        assert!(is_recent_duplicate(&existing, &alert_needle("Ana Souza", 30)));
        // A later milestone for the same person is a new alert.
        assert!(!is_recent_duplicate(&existing, &alert_needle("Ana Souza", 60)));
        assert!(!is_recent_duplicate(&existing, &alert_needle("João Lima", 30)));
    }
}
