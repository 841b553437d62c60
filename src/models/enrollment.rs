//! Enrollment and grade models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub person_id: i64,
    pub class_id: i64,
    pub course_id: i64,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment joined with the enrolled person, used for class rosters
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RosterEntry {
    pub enrollment_id: i64,
    pub person_id: i64,
    pub full_name: String,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub person_id: i64,
    pub class_id: i64,
    pub course_id: i64,
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Grade {
    pub id: i64,
    pub enrollment_id: i64,
    pub subject_id: i64,
    pub score: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordGradeRequest {
    pub enrollment_id: i64,
    pub subject_id: i64,
    pub score: f64,
}

/// Closed set of enrollment lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Active,
    Inactive,
    Pending,
    Dropped,
    Transferred,
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Inactive => "inactive",
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Dropped => "dropped",
            EnrollmentStatus::Transferred => "transferred",
            EnrollmentStatus::Completed => "completed",
        }
    }

    pub fn all() -> &'static [EnrollmentStatus] {
        &[
            EnrollmentStatus::Active,
            EnrollmentStatus::Inactive,
            EnrollmentStatus::Pending,
            EnrollmentStatus::Dropped,
            EnrollmentStatus::Transferred,
            EnrollmentStatus::Completed,
        ]
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "inactive" => Ok(EnrollmentStatus::Inactive),
            "pending" => Ok(EnrollmentStatus::Pending),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            "transferred" => Ok(EnrollmentStatus::Transferred),
            "completed" => Ok(EnrollmentStatus::Completed),
            other => Err(format!("unknown enrollment status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_round_trip_through_strings() {
        for status in EnrollmentStatus::all() {
            assert_eq!(
                status.as_str().parse::<EnrollmentStatus>().unwrap(),
                *status
            );
        }
        assert!("graduated".parse::<EnrollmentStatus>().is_err());
    }
}
