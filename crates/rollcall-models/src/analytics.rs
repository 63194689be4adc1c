//! Read-only analytics views computed by the backend.

use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceRecord;
use crate::courses::CourseSummary;
use crate::ids::{CourseId, DepartmentId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub date: String,
    pub attendance_count: u32,
    pub total_enrolled: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStudent {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceSummary {
    pub student: AnalyticsStudent,
    pub attendance_count: u32,
    pub attendance_percentage: f64,
}

/// Attendance analytics for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAttendanceAnalytics {
    pub course_id: CourseId,
    pub course_name: String,
    pub course_code: String,
    pub total_sessions: u32,
    pub completed_sessions: u32,
    pub average_attendance: f64,
    #[serde(default)]
    pub attendance_by_date: Vec<DailyAttendance>,
    #[serde(default)]
    pub top_attendees: Vec<StudentAttendanceSummary>,
    #[serde(default)]
    pub low_attendance_students: Vec<StudentAttendanceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAttendanceShare {
    pub course: CourseSummary,
    pub average_attendance: f64,
    pub total_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: String,
    pub average_attendance: f64,
    pub total_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentAnalytics {
    pub department_id: DepartmentId,
    pub department_name: String,
    pub total_courses: u32,
    pub total_students: u32,
    pub total_faculty: u32,
    pub average_attendance: f64,
    #[serde(default)]
    pub course_wise_attendance: Vec<CourseAttendanceShare>,
    #[serde(default)]
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentName {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAttendance {
    pub course: CourseSummary,
    pub attendance_count: u32,
    pub total_sessions: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTrendPoint {
    pub date: String,
    pub attended_sessions: u32,
    pub total_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnalytics {
    pub student_id: UserId,
    pub student: StudentName,
    pub overall_attendance: f64,
    #[serde(default)]
    pub course_wise_attendance: Vec<CourseAttendance>,
    #[serde(default)]
    pub attendance_trend: Vec<StudentTrendPoint>,
    #[serde(default)]
    pub recent_attendance: Vec<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_analytics_tolerates_missing_series() {
        let analytics: CourseAttendanceAnalytics = serde_json::from_value(json!({
            "courseId": "c1",
            "courseName": "Operating Systems",
            "courseCode": "CS301",
            "totalSessions": 12,
            "completedSessions": 10,
            "averageAttendance": 81.5
        }))
        .unwrap();
        assert!(analytics.attendance_by_date.is_empty());
        assert_eq!(analytics.completed_sessions, 10);
    }

    #[test]
    fn test_department_analytics_wire_shape() {
        let analytics: DepartmentAnalytics = serde_json::from_value(json!({
            "departmentId": "d1",
            "departmentName": "Computer Science",
            "totalCourses": 4,
            "totalStudents": 120,
            "totalFaculty": 9,
            "averageAttendance": 77.25,
            "courseWiseAttendance": [
                {"course": {"id": "c1", "name": "OS", "code": "CS301"}, "averageAttendance": 80.0, "totalSessions": 12}
            ],
            "monthlyTrends": [{"month": "2025-03", "averageAttendance": 79.0, "totalSessions": 30}]
        }))
        .unwrap();
        assert_eq!(analytics.course_wise_attendance[0].course.code, "CS301");
        assert_eq!(analytics.monthly_trends.len(), 1);
    }
}
