//! Enrollment lifecycle integration tests
//!
//! Database-bound: run with `cargo test -- --ignored` against the Postgres
//! pointed at by `TEST_DATABASE_URL`.

mod helpers;

use serial_test::serial;

use ekklesia::models::{EnrollmentStatus, PersonRole, RecordAttendanceRequest};
use ekklesia::services::EnrollmentService;
use ekklesia::DatabaseService;
use ekklesia::EkklesiaError;

use helpers::database_helper::TestDatabase;
use helpers::test_data;

fn enrollment_service(database: &DatabaseService) -> EnrollmentService {
    EnrollmentService::new(
        database.enrollments.clone(),
        database.people.clone(),
        database.classes.clone(),
        database.events.clone(),
    )
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn bulk_status_change_touches_only_selected_rows() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = enrollment_service(&database);

    let course = test_data::create_test_course(&database).await.unwrap();
    let class_a = test_data::create_test_class(&database, &course).await.unwrap();
    let class_b = test_data::create_test_class(&database, &course).await.unwrap();

    let mut selected = Vec::new();
    for _ in 0..3 {
        let student = test_data::create_test_person(&database, PersonRole::Student)
            .await
            .unwrap();
        let enrollment = service.enroll(student.id, class_a.id).await.unwrap();
        selected.push(enrollment.id);
    }

    let bystander_person = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();
    let bystander = service.enroll(bystander_person.id, class_b.id).await.unwrap();

    let updated = service
        .set_status_bulk(&selected, EnrollmentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(updated, selected.len() as u64);

    for id in &selected {
        let enrollment = service.get(*id).await.unwrap();
        assert_eq!(enrollment.status, "completed");
    }

    let untouched = service.get(bystander.id).await.unwrap();
    assert_eq!(untouched.status, "active");
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn duplicate_live_enrollment_is_refused() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = enrollment_service(&database);

    let course = test_data::create_test_course(&database).await.unwrap();
    let class = test_data::create_test_class(&database, &course).await.unwrap();
    let student = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();

    service.enroll(student.id, class.id).await.unwrap();
    let second = service.enroll(student.id, class.id).await;

    assert!(matches!(second, Err(EkklesiaError::BusinessRule(_))));
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn removal_is_refused_while_attendance_depends_on_it() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = enrollment_service(&database);

    let course = test_data::create_test_course(&database).await.unwrap();
    let class = test_data::create_test_class(&database, &course).await.unwrap();
    let student = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();
    let enrollment = service.enroll(student.id, class.id).await.unwrap();

    database
        .events
        .record_attendance(RecordAttendanceRequest {
            class_id: class.id,
            person_id: student.id,
            session_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            present: true,
            note: None,
        })
        .await
        .unwrap();

    let removal = service.remove(enrollment.id).await;
    assert!(matches!(removal, Err(EkklesiaError::BusinessRule(_))));

    // The refusal left the row in place.
    assert!(service.get(enrollment.id).await.is_ok());
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn transfer_marks_old_enrollment_and_creates_replacement() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let service = enrollment_service(&database);

    let course = test_data::create_test_course(&database).await.unwrap();
    let class_a = test_data::create_test_class(&database, &course).await.unwrap();
    let class_b = test_data::create_test_class(&database, &course).await.unwrap();
    let student = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();

    let original = service.enroll(student.id, class_a.id).await.unwrap();
    let replacement = service.transfer(original.id, class_b.id).await.unwrap();

    let original = service.get(original.id).await.unwrap();
    assert_eq!(original.status, "transferred");
    assert_eq!(replacement.class_id, class_b.id);
    assert_eq!(replacement.status, "active");
}
