//! Course, subject, and curriculum link models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub workload_hours: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// A subject placed inside a course curriculum, in order
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSubject {
    pub course_id: i64,
    pub subject_id: i64,
    pub position: i32,
}

/// A subject taught in a concrete class, optionally by a specific professor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClassSubject {
    pub class_id: i64,
    pub subject_id: i64,
    pub professor_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub workload_hours: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub workload_hours: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub title: String,
    pub description: Option<String>,
}
