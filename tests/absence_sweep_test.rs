//! Absence sweep integration tests
//!
//! Database-bound: run with `cargo test -- --ignored` against the Postgres
//! pointed at by `TEST_DATABASE_URL`.

mod helpers;

use chrono::{Duration, Utc};
use serial_test::serial;

use ekklesia::config::SweepConfig;
use ekklesia::models::PersonRole;
use ekklesia::services::{AbsenceService, NotificationService};
use ekklesia::DatabaseService;

use helpers::database_helper::TestDatabase;
use helpers::test_data;

fn absence_service(database: &DatabaseService) -> AbsenceService {
    AbsenceService::new(
        database.people.clone(),
        NotificationService::new(database.notifications.clone()),
        SweepConfig {
            interval_minutes: 60,
            notification_window_hours: 24,
        },
    )
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn exact_milestone_alerts_each_administrator_once() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = absence_service(&database);

    let admin = test_data::create_test_person(&database, PersonRole::Administrator)
        .await
        .unwrap();
    let coordinator = test_data::create_test_person(&database, PersonRole::Coordinator)
        .await
        .unwrap();

    let absentee = test_data::create_named_person(&database, "Ana Souza", PersonRole::Member)
        .await
        .unwrap();
    let now = Utc::now();
    database
        .people
        .touch_last_activity(absentee.id, now - Duration::days(30))
        .await
        .unwrap();

    let report = service.run_sweep(now).await.unwrap();
    assert_eq!(report.flagged, 1);
    assert_eq!(report.notifications_created, 2);

    for recipient in [admin.id, coordinator.id] {
        let notifications = database
            .notifications
            .list_for_recipient(recipient, 10)
            .await
            .unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Alerta de ausência");
        assert!(notifications[0].content.contains("Ana Souza"));
        assert!(notifications[0].content.contains("30 dias"));
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn off_milestone_days_stay_silent() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = absence_service(&database);

    test_data::create_test_person(&database, PersonRole::Administrator)
        .await
        .unwrap();

    let now = Utc::now();
    for days in [31, 59, 91] {
        let person = test_data::create_test_person(&database, PersonRole::Member)
            .await
            .unwrap();
        database
            .people
            .touch_last_activity(person.id, now - Duration::days(days))
            .await
            .unwrap();
    }

    let report = service.run_sweep(now).await.unwrap();
    assert_eq!(report.flagged, 0);
    assert_eq!(report.notifications_created, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn second_run_inside_the_window_does_not_duplicate() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = absence_service(&database);

    let admin = test_data::create_test_person(&database, PersonRole::Administrator)
        .await
        .unwrap();
    let absentee = test_data::create_named_person(&database, "João Lima", PersonRole::Member)
        .await
        .unwrap();

    let now = Utc::now();
    database
        .people
        .touch_last_activity(absentee.id, now - Duration::days(60))
        .await
        .unwrap();

    let first = service.run_sweep(now).await.unwrap();
    assert_eq!(first.notifications_created, 1);

    let second = service.run_sweep(now + Duration::hours(1)).await.unwrap();
    assert_eq!(second.notifications_created, 0);
    assert_eq!(second.duplicates_skipped, 1);

    let notifications = database
        .notifications
        .list_for_recipient(admin.id, 10)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
}
