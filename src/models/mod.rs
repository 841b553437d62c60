//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod class;
pub mod congregation;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod finance;
pub mod notification;
pub mod person;
pub mod workflow;

// Re-export commonly used models
pub use class::{Class, ClassStatus, CreateClassRequest, UpdateClassRequest};
pub use congregation::{
    Congregation, CreateCongregationRequest, CreateFieldRequest, Field, UpdateCongregationRequest,
};
pub use course::{
    ClassSubject, Course, CourseSubject, CreateCourseRequest, CreateSubjectRequest, Subject,
    UpdateCourseRequest,
};
pub use enrollment::{
    CreateEnrollmentRequest, Enrollment, EnrollmentStatus, Grade, RecordGradeRequest, RosterEntry,
};
pub use event::{
    AttendanceRecord, CreateEventRequest, Event, RecordAttendanceRequest, UpdateEventRequest,
};
pub use finance::{CreateFeeRequest, FeeStatus, FinancialFee};
pub use notification::{CreateNotificationRequest, Message, Notification, SendMessageRequest};
pub use person::{CreatePersonRequest, Person, PersonRole, PersonStatus, UpdatePersonRequest};
pub use workflow::{ApprovalWorkflow, SubmitWorkflowRequest, WorkflowStatus};
