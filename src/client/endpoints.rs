//! Backend endpoint paths, relative to the configured base URL.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const PROFILE: &str = "/auth/profile";
    pub const REFRESH: &str = "/auth/refresh";
}

pub mod departments {
    use rollcall_models::DepartmentId;

    pub const LIST: &str = "/departments";

    pub fn item(id: &DepartmentId) -> String {
        format!("/departments/{}", id)
    }

    pub fn analytics(id: &DepartmentId) -> String {
        format!("/analytics/department/{}", id)
    }
}

pub mod courses {
    use rollcall_models::CourseId;

    pub const LIST: &str = "/courses";
    pub const ENROLL: &str = "/courses/enroll";
    pub const ASSIGN_FACULTY: &str = "/courses/assign-faculty";

    pub fn item(id: &CourseId) -> String {
        format!("/courses/{}", id)
    }

    pub fn analytics(id: &CourseId) -> String {
        format!("/analytics/course/{}", id)
    }
}

pub mod users {
    use rollcall_models::UserId;

    pub const LIST: &str = "/users";
    pub const STUDENTS: &str = "/users/students";
    pub const FACULTY: &str = "/users/faculty";

    pub fn item(id: &UserId) -> String {
        format!("/users/{}", id)
    }
}

pub mod sessions {
    use rollcall_models::SessionId;

    pub const LIST: &str = "/sessions";

    pub fn item(id: &SessionId) -> String {
        format!("/sessions/{}", id)
    }

    pub fn generate_qr(id: &SessionId) -> String {
        format!("/sessions/{}/generate-qr", id)
    }

    pub fn join(id: &SessionId) -> String {
        format!("/sessions/{}/join", id)
    }

    pub fn leave(id: &SessionId) -> String {
        format!("/sessions/{}/leave", id)
    }

    pub fn attendance_status(id: &SessionId) -> String {
        format!("/sessions/{}/attendance-status", id)
    }
}

pub mod attendance {
    use rollcall_models::{SessionId, UserId};

    pub const MARK_QR: &str = "/attendance/mark-qr";
    pub const MARK_ONLINE: &str = "/attendance/mark-online";
    pub const RECENT: &str = "/attendance/recent";

    pub fn student(id: &UserId) -> String {
        format!("/attendance/student/{}", id)
    }

    pub fn session(id: &SessionId) -> String {
        format!("/attendance/session/{}", id)
    }

    pub fn analytics(id: &UserId) -> String {
        format!("/analytics/student/{}", id)
    }
}
