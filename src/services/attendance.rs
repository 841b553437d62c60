//! Attendance and grading service implementation
//!
//! Per-session attendance recording for classes, absence counting, and the
//! aggregate summaries computed by remote procedures.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::database::repositories::{ClassRepository, EnrollmentRepository, EventRepository};
use crate::database::rpc::RpcClient;
use crate::models::enrollment::{Grade, RecordGradeRequest};
use crate::models::event::{AttendanceRecord, RecordAttendanceRequest};
use crate::utils::errors::{EkklesiaError, Result};

/// Attendance service for class sessions and grades
#[derive(Debug, Clone)]
pub struct AttendanceService {
    event_repository: EventRepository,
    class_repository: ClassRepository,
    enrollment_repository: EnrollmentRepository,
    rpc: RpcClient,
}

impl AttendanceService {
    /// Create a new AttendanceService instance
    pub fn new(
        event_repository: EventRepository,
        class_repository: ClassRepository,
        enrollment_repository: EnrollmentRepository,
        rpc: RpcClient,
    ) -> Self {
        Self {
            event_repository,
            class_repository,
            enrollment_repository,
            rpc,
        }
    }

    /// Record one person's attendance for a class session
    pub async fn record(&self, request: RecordAttendanceRequest) -> Result<AttendanceRecord> {
        let class = self
            .class_repository
            .find_by_id(request.class_id)
            .await?
            .ok_or(EkklesiaError::ClassNotFound {
                class_id: request.class_id,
            })?;

        debug!(
            class_id = class.id,
            person_id = request.person_id,
            session_date = %request.session_date,
            present = request.present,
            "Recording attendance"
        );

        self.event_repository.record_attendance(request).await
    }

    /// Record a whole session at once: (person_id, present) pairs
    pub async fn record_session(
        &self,
        class_id: i64,
        session_date: NaiveDate,
        entries: &[(i64, bool)],
    ) -> Result<Vec<AttendanceRecord>> {
        if entries.is_empty() {
            return Err(EkklesiaError::InvalidInput(
                "Session roll call is empty".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(entries.len());
        for &(person_id, present) in entries {
            let record = self
                .record(RecordAttendanceRequest {
                    class_id,
                    person_id,
                    session_date,
                    present,
                    note: None,
                })
                .await?;
            records.push(record);
        }

        info!(
            class_id = class_id,
            session_date = %session_date,
            recorded = records.len(),
            "Session attendance recorded"
        );
        Ok(records)
    }

    /// List attendance of a class session
    pub async fn session(
        &self,
        class_id: i64,
        session_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.event_repository
            .list_attendance_for_session(class_id, session_date)
            .await
    }

    /// Count a person's absences in a class
    pub async fn absence_count(&self, class_id: i64, person_id: i64) -> Result<i64> {
        self.event_repository
            .count_absences(class_id, person_id)
            .await
    }

    /// Attendance summary of a class over a period, aggregated server-side
    pub async fn summary(
        &self,
        class_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<serde_json::Value> {
        let response = self
            .rpc
            .call(
                "attendance_summary",
                serde_json::json!({
                    "class_id": class_id,
                    "from": from,
                    "to": to,
                }),
            )
            .await?
            .into_result()?;

        Ok(response.data.unwrap_or(serde_json::Value::Null))
    }

    /// Record a grade against an enrollment
    pub async fn record_grade(&self, request: RecordGradeRequest) -> Result<Grade> {
        if !(0.0..=10.0).contains(&request.score) {
            return Err(EkklesiaError::InvalidInput(format!(
                "Score {} is outside the 0-10 scale",
                request.score
            )));
        }

        let enrollment_id = request.enrollment_id;
        self.enrollment_repository
            .find_by_id(enrollment_id)
            .await?
            .ok_or(EkklesiaError::EnrollmentNotFound { enrollment_id })?;

        let grade = self.enrollment_repository.record_grade(request).await?;
        info!(enrollment_id = enrollment_id, grade_id = grade.id, "Grade recorded");

        Ok(grade)
    }

    /// Student average across recorded grades, computed server-side
    pub async fn student_average(&self, enrollment_id: i64) -> Result<Option<f64>> {
        let response = self
            .rpc
            .call(
                "student_average",
                serde_json::json!({ "enrollment_id": enrollment_id }),
            )
            .await?
            .into_result()?;

        let average = response
            .data
            .as_ref()
            .and_then(|data| data.get("average"))
            .and_then(|value| value.as_f64());

        Ok(average)
    }
}
