//! Courses, enrollment and faculty assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::departments::DepartmentSummary;
use crate::ids::{CourseId, DepartmentId, UserId};
use crate::validation::required;

fn default_active() -> bool {
    true
}

fn required_department(id: &DepartmentId) -> Result<(), validator::ValidationError> {
    required(id.as_str(), "Department is required")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub credits: u8,
    pub semester: u8,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub department: DepartmentSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<Vec<FacultySummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Course reference embedded in departments and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[serde(default)]
    pub id: CourseId,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultySummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, message = "Course name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Course code is required"))]
    pub code: String,
    #[validate(range(min = 1, max = 6, message = "Credits must be between 1 and 6"))]
    pub credits: u8,
    #[validate(custom(function = "required_department"))]
    pub department_id: DepartmentId,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Course name is required"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Course code is required"))]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 6, message = "Credits must be between 1 and 6"))]
    pub credits: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub course_id: CourseId,
    pub student_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyAssignmentRequest {
    pub course_id: CourseId,
    pub faculty_id: UserId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<u8>,
}

impl CourseFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
