//! Class deletion guard integration tests
//!
//! Database-bound: run with `cargo test -- --ignored` against the Postgres
//! pointed at by `TEST_DATABASE_URL`.

mod helpers;

use serial_test::serial;

use ekklesia::models::{EnrollmentStatus, PersonRole};
use ekklesia::services::{ClassService, EnrollmentService};
use ekklesia::DatabaseService;
use ekklesia::EkklesiaError;

use helpers::database_helper::TestDatabase;
use helpers::test_data;

fn class_service(database: &DatabaseService) -> ClassService {
    ClassService::new(
        database.classes.clone(),
        database.courses.clone(),
        database.enrollments.clone(),
        database.events.clone(),
    )
}

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
async fn deletion_is_refused_while_active_enrollments_exist() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let classes = class_service(&database);
    let enrollments = enrollment_service(&database);

    let course = test_data::create_test_course(&database).await.unwrap();
    let class = test_data::create_test_class(&database, &course).await.unwrap();
    let student = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();
    enrollments.enroll(student.id, class.id).await.unwrap();

    let deletion = classes.delete(class.id).await;
    match deletion {
        Err(EkklesiaError::BusinessRule(message)) => {
            assert!(message.contains("active enrollment"), "{message}");
        }
        other => panic!("expected a business-rule refusal, got {other:?}"),
    }

    // No row was removed.
    assert!(classes.get(class.id).await.is_ok());

    // The soft alternative is always available.
    let deactivated = classes.deactivate(class.id).await.unwrap();
    assert_eq!(deactivated.status, "inactive");
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL pointing at a provisioned Postgres"]
async fn deletion_succeeds_once_nothing_references_the_class() {
    let test_db = TestDatabase::new().await.unwrap();
    let database = DatabaseService::new(test_db.pool.clone());
    let classes = class_service(&database);
    let enrollments = enrollment_service(&database);

    let course = test_data::create_test_course(&database).await.unwrap();
    let class = test_data::create_test_class(&database, &course).await.unwrap();
    let student = test_data::create_test_person(&database, PersonRole::Student)
        .await
        .unwrap();
    let enrollment = enrollments.enroll(student.id, class.id).await.unwrap();

    // Dropping the enrollment clears the guard; no attendance was recorded.
    enrollments
        .set_status(enrollment.id, EnrollmentStatus::Dropped)
        .await
        .unwrap();
    enrollments.remove(enrollment.id).await.unwrap();

    classes.delete(class.id).await.unwrap();
    assert!(matches!(
        classes.get(class.id).await,
        Err(EkklesiaError::ClassNotFound { .. })
    ));
}
