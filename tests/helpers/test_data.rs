//! Test data helpers for creating fixture rows
//!
//! This module provides helper functions for seeding people, courses,
//! classes, and enrollments used across the integration tests.

use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use ekklesia::database::DatabaseService;
use ekklesia::models::{
    Class, Course, CreateClassRequest, CreateCourseRequest, CreatePersonRequest, Person, PersonRole,
};

/// Unique email so the `people.email` constraint never trips across fixtures
fn unique_email() -> String {
    format!("{}@example.org", Uuid::new_v4().simple())
}

/// Seed a person with a generated name and email
pub async fn create_test_person(
    database: &DatabaseService,
    role: PersonRole,
) -> Result<Person, ekklesia::EkklesiaError> {
    database
        .people
        .create(CreatePersonRequest {
            full_name: Name().fake(),
            email: Some(unique_email()),
            phone: None,
            cpf: None,
            role,
            congregation_id: None,
        })
        .await
}

/// Seed a person with a fixed name (for assertions against alert content)
pub async fn create_named_person(
    database: &DatabaseService,
    full_name: &str,
    role: PersonRole,
) -> Result<Person, ekklesia::EkklesiaError> {
    database
        .people
        .create(CreatePersonRequest {
            full_name: full_name.to_string(),
            email: Some(unique_email()),
            phone: None,
            cpf: None,
            role,
            congregation_id: None,
        })
        .await
}

/// Seed a course
pub async fn create_test_course(
    database: &DatabaseService,
) -> Result<Course, ekklesia::EkklesiaError> {
    database
        .courses
        .create(CreateCourseRequest {
            title: "Discipulado Básico".to_string(),
            description: None,
            workload_hours: Some(40),
        })
        .await
}

/// Seed a class under a course
pub async fn create_test_class(
    database: &DatabaseService,
    course: &Course,
) -> Result<Class, ekklesia::EkklesiaError> {
    database
        .classes
        .create(CreateClassRequest {
            course_id: course.id,
            congregation_id: None,
            name: format!("{} - Turma A", course.title),
            professor_id: None,
            starts_on: None,
            ends_on: None,
        })
        .await
}
