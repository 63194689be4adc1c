//! Dashboard summary, aggregated on the client from courses, sessions and
//! users.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::sessions::SessionStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Attendance percentage over that day's sessions.
    pub attendance: f64,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSession {
    pub id: SessionId,
    pub title: String,
    pub course: String,
    pub time: DateTime<Utc>,
    pub status: SessionStatus,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_faculty: usize,
    pub total_courses: usize,
    pub total_sessions: usize,
    pub today_sessions: usize,
    pub average_attendance: f64,
    pub attendance_trend: Vec<TrendPoint>,
    pub recent_sessions: Vec<RecentSession>,
}
