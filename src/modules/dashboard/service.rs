//! Dashboard summary.
//!
//! There is no dedicated endpoint: courses, sessions and users are fetched
//! concurrently and reduced here.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use rollcall_core::ClientError;
use rollcall_models::{
    ClassSession, Course, CourseFilters, DashboardStats, RecentSession, Role, SessionFilters,
    TrendPoint, User, UserFilters,
};
use tracing::instrument;

use crate::client::ApiClient;
use crate::modules::courses::CourseService;
use crate::modules::sessions::SessionService;
use crate::modules::users::UserService;

/// Days covered by the attendance trend, today included.
pub const TREND_DAYS: u64 = 30;

pub const RECENT_SESSIONS: usize = 5;

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(api))]
    pub async fn dashboard_stats(api: &ApiClient) -> Result<DashboardStats, ClientError> {
        let course_filters = CourseFilters::default();
        let session_filters = SessionFilters::default();
        let user_filters = UserFilters::default();

        let (courses, sessions, users) = tokio::try_join!(
            CourseService::list_courses(api, &course_filters),
            SessionService::list_sessions(api, &session_filters),
            UserService::list_users(api, &user_filters),
        )?;

        Ok(compute_stats(&courses, &sessions, &users, Local::now()))
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reduces the three lists into the summary. Days are counted in the
/// time zone of `now`.
pub fn compute_stats<Tz: TimeZone>(
    courses: &[Course],
    sessions: &[ClassSession],
    users: &[User],
    now: DateTime<Tz>,
) -> DashboardStats {
    let tz = now.timezone();
    let day_of = |session: &ClassSession| -> NaiveDate {
        session.scheduled_start_time.with_timezone(&tz).date_naive()
    };
    let today = now.date_naive();

    let total_students = users.iter().filter(|u| u.role == Role::Student).count();
    let total_faculty = users.iter().filter(|u| u.role == Role::Faculty).count();
    let today_sessions = sessions.iter().filter(|s| day_of(s) == today).count();

    let attended: u64 = sessions.iter().map(|s| u64::from(s.attendance_count)).sum();
    let possible = (sessions.len() * total_students) as u64;

    let attendance_trend = (0..TREND_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let day: Vec<&ClassSession> = sessions.iter().filter(|s| day_of(s) == date).collect();
            let present: u64 = day.iter().map(|s| u64::from(s.attendance_count)).sum();
            let enrolled: u64 = day.iter().map(|s| u64::from(s.total_enrolled)).sum();
            TrendPoint {
                date,
                attendance: percentage(present, enrolled),
                sessions: day.len(),
            }
        })
        .collect();

    let mut by_start: Vec<&ClassSession> = sessions.iter().collect();
    by_start.sort_by(|a, b| b.scheduled_start_time.cmp(&a.scheduled_start_time));
    let recent_sessions = by_start
        .into_iter()
        .take(RECENT_SESSIONS)
        .map(|s| RecentSession {
            id: s.id.clone(),
            title: s.title.clone(),
            course: s.course.name.clone(),
            time: s.scheduled_start_time,
            status: s.status,
            attendance_rate: s.attendance_rate(),
        })
        .collect();

    DashboardStats {
        total_students,
        total_faculty,
        total_courses: courses.len(),
        total_sessions: sessions.len(),
        today_sessions,
        average_attendance: round2(percentage(attended, possible)),
        attendance_trend,
        recent_sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rollcall_models::courses::CourseSummary;
    use rollcall_models::sessions::SessionFaculty;
    use rollcall_models::{CourseId, SessionId, SessionStatus, SessionType, UserId};

    fn user(id: &str, role: Role) -> User {
        User {
            id: UserId::new(id),
            email: format!("{}@uni.edu", id),
            first_name: id.to_string(),
            last_name: "Test".to_string(),
            role,
            profile_picture: None,
            department: None,
            phone_number: None,
            student_id: None,
            employee_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn session(id: &str, start: DateTime<Utc>, present: u32, enrolled: u32) -> ClassSession {
        ClassSession {
            id: SessionId::new(id),
            title: format!("Session {}", id),
            description: None,
            session_type: SessionType::Offline,
            course: CourseSummary {
                id: CourseId::new("c1"),
                name: "Algorithms".to_string(),
                code: "CS201".to_string(),
            },
            faculty: SessionFaculty {
                id: UserId::new("f1"),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            },
            scheduled_start_time: start,
            scheduled_end_time: start + Duration::hours(1),
            actual_start_time: None,
            actual_end_time: None,
            location: None,
            google_meet_link: None,
            qr_code: None,
            attendance_count: present,
            total_enrolled: enrolled,
            status: SessionStatus::Completed,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_inputs_give_zeroes() {
        let stats = compute_stats(&[], &[], &[], Utc::now());
        assert_eq!(stats.average_attendance, 0.0);
        assert_eq!(stats.attendance_trend.len(), TREND_DAYS as usize);
        assert!(stats.recent_sessions.is_empty());
    }

    #[test]
    fn test_counts_and_average() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let users = vec![
            user("s1", Role::Student),
            user("s2", Role::Student),
            user("s3", Role::Student),
            user("f1", Role::Faculty),
            user("a1", Role::Admin),
        ];
        let sessions = vec![
            session("1", now - Duration::hours(2), 2, 3),
            session("2", now - Duration::days(1), 1, 3),
        ];

        let stats = compute_stats(&[], &sessions, &users, now);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.total_faculty, 1);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.today_sessions, 1);
        // 3 present out of 2 sessions x 3 students
        assert_eq!(stats.average_attendance, 50.0);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let users = vec![
            user("s1", Role::Student),
            user("s2", Role::Student),
            user("s3", Role::Student),
        ];
        let sessions = vec![session("1", now, 1, 3)];

        let stats = compute_stats(&[], &sessions, &users, now);
        assert_eq!(stats.average_attendance, 33.33);
    }

    #[test]
    fn test_trend_ends_today_and_uses_enrolled_totals() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let sessions = vec![
            session("1", now - Duration::hours(1), 3, 4),
            session("2", now - Duration::hours(3), 1, 4),
            session("3", now - Duration::days(40), 4, 4),
        ];

        let stats = compute_stats(&[], &sessions, &[], now);
        let last = stats.attendance_trend.last().unwrap();
        assert_eq!(last.date, now.date_naive());
        assert_eq!(last.sessions, 2);
        assert_eq!(last.attendance, 50.0);

        let first = stats.attendance_trend.first().unwrap();
        assert_eq!(first.date, now.date_naive() - Days::new(TREND_DAYS - 1));
        assert_eq!(stats.attendance_trend.iter().map(|p| p.sessions).sum::<usize>(), 2);
    }

    #[test]
    fn test_recent_sessions_newest_first_capped() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let sessions: Vec<ClassSession> = (0..7)
            .map(|i| session(&i.to_string(), now - Duration::days(i), 1, 2))
            .collect();

        let stats = compute_stats(&[], &sessions, &[], now);
        let ids: Vec<&str> = stats.recent_sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
        assert_eq!(stats.recent_sessions[0].course, "Algorithms");
        assert_eq!(stats.recent_sessions[0].attendance_rate, 50.0);
    }
}
