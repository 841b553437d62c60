//! Class service implementation
//!
//! Classes are the concrete offerings of a course inside a congregation.
//! Deletion is guarded: a class referenced by active enrollments or by
//! attendance history can only be deactivated, never removed.

use tracing::{debug, info, warn};

use crate::database::repositories::{ClassRepository, CourseRepository, EnrollmentRepository, EventRepository};
use crate::models::class::{Class, ClassStatus, CreateClassRequest, UpdateClassRequest};
use crate::models::enrollment::{EnrollmentStatus, RosterEntry};
use crate::utils::errors::{EkklesiaError, Result};

/// Class service for managing class lifecycle
#[derive(Debug, Clone)]
pub struct ClassService {
    class_repository: ClassRepository,
    course_repository: CourseRepository,
    enrollment_repository: EnrollmentRepository,
    event_repository: EventRepository,
}

impl ClassService {
    /// Create a new ClassService instance
    pub fn new(
        class_repository: ClassRepository,
        course_repository: CourseRepository,
        enrollment_repository: EnrollmentRepository,
        event_repository: EventRepository,
    ) -> Self {
        Self {
            class_repository,
            course_repository,
            enrollment_repository,
            event_repository,
        }
    }

    /// Create a new class under an existing course
    pub async fn create(&self, request: CreateClassRequest) -> Result<Class> {
        debug!(course_id = request.course_id, name = %request.name, "Creating class");

        if request.name.trim().is_empty() {
            return Err(EkklesiaError::InvalidInput(
                "Class name is required".to_string(),
            ));
        }

        let course = self
            .course_repository
            .find_by_id(request.course_id)
            .await?
            .ok_or_else(|| {
                EkklesiaError::InvalidInput(format!("Course {} does not exist", request.course_id))
            })?;

        if !course.active {
            return Err(EkklesiaError::BusinessRule(format!(
                "Course \"{}\" is inactive and cannot receive new classes",
                course.title
            )));
        }

        let class = self.class_repository.create(request).await?;
        info!(class_id = class.id, course_id = class.course_id, "Class created");

        Ok(class)
    }

    /// Get class by ID
    pub async fn get(&self, class_id: i64) -> Result<Class> {
        self.class_repository
            .find_by_id(class_id)
            .await?
            .ok_or(EkklesiaError::ClassNotFound { class_id })
    }

    /// Update class details
    pub async fn update(&self, class_id: i64, request: UpdateClassRequest) -> Result<Class> {
        let existing = self.get(class_id).await?;
        let class = self.class_repository.update(existing.id, request).await?;

        info!(class_id = class.id, "Class updated");
        Ok(class)
    }

    /// Deactivate a class (the soft alternative to deletion)
    pub async fn deactivate(&self, class_id: i64) -> Result<Class> {
        let existing = self.get(class_id).await?;
        let class = self
            .class_repository
            .set_status(existing.id, ClassStatus::Inactive)
            .await?;

        info!(class_id = class_id, "Class deactivated");
        Ok(class)
    }

    /// Delete a class. Refused with a descriptive error while active
    /// enrollments or attendance history reference it; no row is removed in
    /// that case.
    pub async fn delete(&self, class_id: i64) -> Result<()> {
        let class = self.get(class_id).await?;

        let active_enrollments = self
            .enrollment_repository
            .count_by_class_and_status(class.id, EnrollmentStatus::Active)
            .await?;
        let attendance_records = self
            .event_repository
            .count_attendance_for_class(class.id)
            .await?;

        if active_enrollments > 0 || attendance_records > 0 {
            warn!(
                class_id = class_id,
                active_enrollments = active_enrollments,
                attendance_records = attendance_records,
                "Refusing class deletion"
            );
            return Err(EkklesiaError::BusinessRule(format!(
                "Cannot delete class \"{}\": {} active enrollment(s) and {} attendance record(s) reference it. Deactivate the class instead.",
                class.name, active_enrollments, attendance_records
            )));
        }

        self.class_repository.delete(class.id).await?;
        info!(class_id = class_id, "Class deleted");

        Ok(())
    }

    /// Class roster: enrolled people with their enrollment status
    pub async fn roster(&self, class_id: i64) -> Result<Vec<RosterEntry>> {
        let class = self.get(class_id).await?;
        self.class_repository.roster(class.id).await
    }

    /// List classes of a course
    pub async fn list_by_course(&self, course_id: i64) -> Result<Vec<Class>> {
        self.class_repository.list_by_course(course_id).await
    }

    /// List classes of a congregation
    pub async fn list_by_congregation(&self, congregation_id: i64) -> Result<Vec<Class>> {
        self.class_repository
            .list_by_congregation(congregation_id)
            .await
    }
}
