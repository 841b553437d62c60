//! Enrollment service implementation
//!
//! Enrollments link a person, a class, and a course, and carry their own
//! lifecycle status. Status moves individually or in bulk; removal is only
//! allowed once no attendance or grade rows depend on the enrollment.

use tracing::{debug, info, warn};

use crate::database::repositories::{
    ClassRepository, EnrollmentRepository, EventRepository, PersonRepository,
};
use crate::models::enrollment::{CreateEnrollmentRequest, Enrollment, EnrollmentStatus};
use crate::utils::errors::{EkklesiaError, Result};

/// Enrollment service for lifecycle management
#[derive(Debug, Clone)]
pub struct EnrollmentService {
    enrollment_repository: EnrollmentRepository,
    person_repository: PersonRepository,
    class_repository: ClassRepository,
    event_repository: EventRepository,
}

impl EnrollmentService {
    /// Create a new EnrollmentService instance
    pub fn new(
        enrollment_repository: EnrollmentRepository,
        person_repository: PersonRepository,
        class_repository: ClassRepository,
        event_repository: EventRepository,
    ) -> Self {
        Self {
            enrollment_repository,
            person_repository,
            class_repository,
            event_repository,
        }
    }

    /// Enroll a person into a class. The person and the class must both be
    /// active, and a person cannot hold two live enrollments in one class.
    pub async fn enroll(&self, person_id: i64, class_id: i64) -> Result<Enrollment> {
        debug!(person_id = person_id, class_id = class_id, "Enrolling person");

        let person = self
            .person_repository
            .find_by_id(person_id)
            .await?
            .ok_or(EkklesiaError::PersonNotFound { person_id })?;
        if !person.is_active() {
            return Err(EkklesiaError::BusinessRule(format!(
                "{} is inactive and cannot be enrolled",
                person.full_name
            )));
        }

        let class = self
            .class_repository
            .find_by_id(class_id)
            .await?
            .ok_or(EkklesiaError::ClassNotFound { class_id })?;
        if !class.is_active() {
            return Err(EkklesiaError::BusinessRule(format!(
                "Class \"{}\" is inactive and cannot receive enrollments",
                class.name
            )));
        }

        let live_statuses = [
            EnrollmentStatus::Active.as_str(),
            EnrollmentStatus::Pending.as_str(),
        ];
        if let Some(existing) = self
            .enrollment_repository
            .find_for_person_in_class(person_id, class_id, &live_statuses)
            .await?
        {
            return Err(EkklesiaError::BusinessRule(format!(
                "{} already holds a {} enrollment in class \"{}\"",
                person.full_name, existing.status, class.name
            )));
        }

        let enrollment = self
            .enrollment_repository
            .create(CreateEnrollmentRequest {
                person_id,
                class_id,
                course_id: class.course_id,
                status: Some(EnrollmentStatus::Active),
            })
            .await?;

        info!(
            enrollment_id = enrollment.id,
            person_id = person_id,
            class_id = class_id,
            "Person enrolled"
        );
        Ok(enrollment)
    }

    /// Get enrollment by ID
    pub async fn get(&self, enrollment_id: i64) -> Result<Enrollment> {
        self.enrollment_repository
            .find_by_id(enrollment_id)
            .await?
            .ok_or(EkklesiaError::EnrollmentNotFound { enrollment_id })
    }

    /// Transition one enrollment to a new status
    pub async fn set_status(
        &self,
        enrollment_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        let existing = self.get(enrollment_id).await?;
        let enrollment = self
            .enrollment_repository
            .set_status(existing.id, status)
            .await?;

        info!(enrollment_id = enrollment_id, status = %status, "Enrollment status changed");
        Ok(enrollment)
    }

    /// Transition every selected enrollment to the target status. Returns the
    /// number of rows updated; IDs that matched no row are reported, not
    /// silently dropped.
    pub async fn set_status_bulk(
        &self,
        enrollment_ids: &[i64],
        status: EnrollmentStatus,
    ) -> Result<u64> {
        if enrollment_ids.is_empty() {
            return Err(EkklesiaError::InvalidInput(
                "No enrollments selected".to_string(),
            ));
        }

        let updated = self
            .enrollment_repository
            .set_status_bulk(enrollment_ids, status)
            .await?;

        if updated != enrollment_ids.len() as u64 {
            warn!(
                selected = enrollment_ids.len(),
                updated = updated,
                "Bulk status change matched fewer rows than selected"
            );
        }

        info!(updated = updated, status = %status, "Bulk enrollment status change applied");
        Ok(updated)
    }

    /// Transfer an enrollment to another class: the old row is marked
    /// transferred and a fresh active enrollment is created in the target.
    pub async fn transfer(&self, enrollment_id: i64, target_class_id: i64) -> Result<Enrollment> {
        let enrollment = self.get(enrollment_id).await?;

        if enrollment.class_id == target_class_id {
            return Err(EkklesiaError::BusinessRule(
                "Enrollment already belongs to the target class".to_string(),
            ));
        }

        let target = self
            .class_repository
            .find_by_id(target_class_id)
            .await?
            .ok_or(EkklesiaError::ClassNotFound {
                class_id: target_class_id,
            })?;
        if !target.is_active() {
            return Err(EkklesiaError::BusinessRule(format!(
                "Class \"{}\" is inactive and cannot receive transfers",
                target.name
            )));
        }

        self.enrollment_repository
            .set_status(enrollment.id, EnrollmentStatus::Transferred)
            .await?;

        let replacement = self
            .enrollment_repository
            .create(CreateEnrollmentRequest {
                person_id: enrollment.person_id,
                class_id: target.id,
                course_id: target.course_id,
                status: Some(EnrollmentStatus::Active),
            })
            .await?;

        info!(
            enrollment_id = enrollment_id,
            replacement_id = replacement.id,
            target_class_id = target_class_id,
            "Enrollment transferred"
        );
        Ok(replacement)
    }

    /// Remove an enrollment. Refused while dependent attendance or grade rows
    /// exist.
    pub async fn remove(&self, enrollment_id: i64) -> Result<()> {
        let enrollment = self.get(enrollment_id).await?;

        let attendance = self
            .event_repository
            .count_attendance_for_person_in_class(enrollment.class_id, enrollment.person_id)
            .await?;
        let grades = self
            .enrollment_repository
            .count_grades(enrollment.id)
            .await?;

        if attendance > 0 || grades > 0 {
            warn!(
                enrollment_id = enrollment_id,
                attendance = attendance,
                grades = grades,
                "Refusing enrollment removal"
            );
            return Err(EkklesiaError::BusinessRule(format!(
                "Cannot remove enrollment {}: {} attendance record(s) and {} grade(s) depend on it",
                enrollment.id, attendance, grades
            )));
        }

        self.enrollment_repository.delete(enrollment.id).await?;
        info!(enrollment_id = enrollment_id, "Enrollment removed");

        Ok(())
    }

    /// List enrollments of a person
    pub async fn list_for_person(&self, person_id: i64) -> Result<Vec<Enrollment>> {
        self.enrollment_repository.list_by_person(person_id).await
    }

    /// List enrollments of a class
    pub async fn list_for_class(&self, class_id: i64) -> Result<Vec<Enrollment>> {
        self.enrollment_repository.list_by_class(class_id).await
    }
}
