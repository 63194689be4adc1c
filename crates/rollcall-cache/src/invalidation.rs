//! Which cached queries each mutation makes stale.
//!
//! This is the only synchronization between mutations and queries: after a
//! mutation succeeds the client invalidates every prefix returned by
//! [`Mutation::invalidates`].

use rollcall_models::{CourseId, DepartmentId, SessionId, UserId};

use crate::key::QueryKey;
use crate::keys;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateDepartment,
    UpdateDepartment(DepartmentId),
    DeleteDepartment(DepartmentId),

    CreateCourse,
    UpdateCourse(CourseId),
    DeleteCourse(CourseId),
    EnrollStudent,
    AssignFaculty,

    CreateSession,
    UpdateSession(SessionId),
    DeleteSession(SessionId),
    GenerateQr(SessionId),
    JoinSession(SessionId),
    LeaveSession(SessionId),

    MarkAttendanceQr,
    MarkAttendanceOnline,

    CreateUser,
    UpdateUser(UserId),
    DeleteUser(UserId),
}

impl Mutation {
    /// Key prefixes to invalidate once the mutation succeeds.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::CreateDepartment => vec![keys::departments::lists()],
            Mutation::UpdateDepartment(id) | Mutation::DeleteDepartment(id) => vec![
                keys::departments::lists(),
                keys::departments::detail(id),
            ],

            Mutation::CreateCourse => vec![keys::courses::lists()],
            Mutation::UpdateCourse(id) | Mutation::DeleteCourse(id) => {
                vec![keys::courses::lists(), keys::courses::detail(id)]
            }
            Mutation::EnrollStudent | Mutation::AssignFaculty => vec![keys::courses::lists()],

            Mutation::CreateSession => vec![keys::sessions::lists()],
            Mutation::UpdateSession(id) | Mutation::DeleteSession(id) => {
                vec![keys::sessions::lists(), keys::sessions::detail(id)]
            }
            Mutation::GenerateQr(id) => vec![keys::sessions::detail(id)],
            Mutation::JoinSession(_) | Mutation::LeaveSession(_) => {
                vec![keys::sessions::lists()]
            }

            Mutation::MarkAttendanceQr | Mutation::MarkAttendanceOnline => {
                vec![keys::attendance::all(), keys::sessions::all()]
            }

            Mutation::CreateUser | Mutation::UpdateUser(_) | Mutation::DeleteUser(_) => {
                vec![keys::users::all()]
            }
        }
    }

    /// Stable name for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::CreateDepartment => "create_department",
            Mutation::UpdateDepartment(_) => "update_department",
            Mutation::DeleteDepartment(_) => "delete_department",
            Mutation::CreateCourse => "create_course",
            Mutation::UpdateCourse(_) => "update_course",
            Mutation::DeleteCourse(_) => "delete_course",
            Mutation::EnrollStudent => "enroll_student",
            Mutation::AssignFaculty => "assign_faculty",
            Mutation::CreateSession => "create_session",
            Mutation::UpdateSession(_) => "update_session",
            Mutation::DeleteSession(_) => "delete_session",
            Mutation::GenerateQr(_) => "generate_qr",
            Mutation::JoinSession(_) => "join_session",
            Mutation::LeaveSession(_) => "leave_session",
            Mutation::MarkAttendanceQr => "mark_attendance_qr",
            Mutation::MarkAttendanceOnline => "mark_attendance_online",
            Mutation::CreateUser => "create_user",
            Mutation::UpdateUser(_) => "update_user",
            Mutation::DeleteUser(_) => "delete_user",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(mutation: &Mutation, key: &QueryKey) -> bool {
        mutation.invalidates().iter().any(|p| key.starts_with(p))
    }

    #[test]
    fn test_create_invalidates_lists_only() {
        let m = Mutation::CreateDepartment;
        assert!(hits(&m, &keys::departments::lists()));
        assert!(!hits(&m, &keys::departments::detail(&DepartmentId::from("d1"))));
    }

    #[test]
    fn test_update_and_delete_invalidate_list_and_detail() {
        let id = CourseId::from("c1");
        for m in [Mutation::UpdateCourse(id.clone()), Mutation::DeleteCourse(id.clone())] {
            assert!(hits(&m, &keys::courses::lists()));
            assert!(hits(&m, &keys::courses::detail(&id)));
            assert!(!hits(&m, &keys::courses::detail(&CourseId::from("c2"))));
            assert!(!hits(&m, &keys::courses::analytics(&id)));
        }
    }

    #[test]
    fn test_generate_qr_invalidates_session_detail() {
        let id = SessionId::from("s1");
        let m = Mutation::GenerateQr(id.clone());
        assert!(hits(&m, &keys::sessions::detail(&id)));
        assert!(!hits(&m, &keys::sessions::lists()));
    }

    #[test]
    fn test_marking_attendance_invalidates_attendance_and_sessions() {
        let session = SessionId::from("s1");
        for m in [Mutation::MarkAttendanceQr, Mutation::MarkAttendanceOnline] {
            assert!(hits(&m, &keys::attendance::session(&session)));
            assert!(hits(&m, &keys::attendance::recent()));
            assert!(hits(&m, &keys::sessions::lists()));
            assert!(hits(&m, &keys::sessions::detail(&session)));
            assert!(hits(&m, &keys::sessions::attendance(&session)));
            assert!(!hits(&m, &keys::courses::lists()));
        }
    }

    #[test]
    fn test_join_and_leave_invalidate_session_lists() {
        let m = Mutation::JoinSession(SessionId::from("s1"));
        assert!(hits(&m, &keys::sessions::lists()));
        assert!(!hits(&m, &keys::sessions::detail(&SessionId::from("s1"))));
    }

    #[test]
    fn test_enroll_invalidates_course_lists() {
        assert!(hits(&Mutation::EnrollStudent, &keys::courses::lists()));
        assert!(hits(&Mutation::AssignFaculty, &keys::courses::lists()));
    }

    #[test]
    fn test_user_mutations_invalidate_every_user_list() {
        let m = Mutation::UpdateUser(UserId::from("u1"));
        assert!(hits(&m, &keys::users::lists()));
        assert!(hits(&m, &keys::users::students()));
        assert!(hits(&m, &keys::users::faculty()));
    }
}
