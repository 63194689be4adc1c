//! Query key builders.
//!
//! Every resource has one module producing its keys, so the hierarchy
//! `resource -> list/detail/analytics -> filters/id` is defined once.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::key::QueryKey;

/// Short, stable fingerprint of a filter value for use as a key segment.
///
/// Filters serialize to JSON with a fixed field order, so equal filters
/// always hash equally.
pub fn hash_filters<T: Serialize>(filters: &T) -> String {
    let encoded = serde_json::to_vec(filters).unwrap_or_default();
    let digest = Sha256::digest(&encoded);
    hex::encode(&digest[..8])
}

/// Builds a list key; an empty filter set shares the unfiltered list key.
fn list_key<T: Serialize>(lists: QueryKey, filters: &T, is_empty: bool) -> QueryKey {
    if is_empty {
        lists
    } else {
        lists.with(hash_filters(filters))
    }
}

pub mod departments {
    use super::*;
    use rollcall_models::{DepartmentFilters, DepartmentId};

    pub fn all() -> QueryKey {
        QueryKey::root("departments")
    }

    pub fn lists() -> QueryKey {
        all().with("list")
    }

    pub fn list(filters: &DepartmentFilters) -> QueryKey {
        list_key(lists(), filters, filters.is_empty())
    }

    pub fn details() -> QueryKey {
        all().with("detail")
    }

    pub fn detail(id: &DepartmentId) -> QueryKey {
        details().with(id.as_str())
    }

    pub fn analytics(id: &DepartmentId) -> QueryKey {
        all().with("analytics").with(id.as_str())
    }
}

pub mod courses {
    use super::*;
    use rollcall_models::{CourseFilters, CourseId};

    pub fn all() -> QueryKey {
        QueryKey::root("courses")
    }

    pub fn lists() -> QueryKey {
        all().with("list")
    }

    pub fn list(filters: &CourseFilters) -> QueryKey {
        list_key(lists(), filters, filters.is_empty())
    }

    pub fn details() -> QueryKey {
        all().with("detail")
    }

    pub fn detail(id: &CourseId) -> QueryKey {
        details().with(id.as_str())
    }

    pub fn analytics(id: &CourseId) -> QueryKey {
        all().with("analytics").with(id.as_str())
    }
}

pub mod sessions {
    use super::*;
    use rollcall_models::{SessionFilters, SessionId};

    pub fn all() -> QueryKey {
        QueryKey::root("sessions")
    }

    pub fn lists() -> QueryKey {
        all().with("list")
    }

    pub fn list(filters: &SessionFilters) -> QueryKey {
        list_key(lists(), filters, filters.is_empty())
    }

    pub fn details() -> QueryKey {
        all().with("detail")
    }

    pub fn detail(id: &SessionId) -> QueryKey {
        details().with(id.as_str())
    }

    /// The signed-in user's attendance status in a session.
    pub fn attendance(id: &SessionId) -> QueryKey {
        all().with("attendance").with(id.as_str())
    }
}

pub mod attendance {
    use super::*;
    use rollcall_models::{CourseId, SessionId, UserId};

    pub fn all() -> QueryKey {
        QueryKey::root("attendance")
    }

    pub fn student(student_id: &UserId, course_id: Option<&CourseId>) -> QueryKey {
        all()
            .with("student")
            .with(student_id.as_str())
            .with(course_id.map(CourseId::as_str).unwrap_or("all"))
    }

    pub fn session(session_id: &SessionId) -> QueryKey {
        all().with("session").with(session_id.as_str())
    }

    pub fn analytics(student_id: &UserId) -> QueryKey {
        all().with("analytics").with(student_id.as_str())
    }

    pub fn recent() -> QueryKey {
        all().with("recent")
    }
}

pub mod users {
    use super::*;
    use rollcall_models::UserFilters;

    pub fn all() -> QueryKey {
        QueryKey::root("users")
    }

    pub fn lists() -> QueryKey {
        all().with("list")
    }

    pub fn list(filters: &UserFilters) -> QueryKey {
        list_key(lists(), filters, filters.is_empty())
    }

    pub fn students() -> QueryKey {
        all().with("students")
    }

    pub fn faculty() -> QueryKey {
        all().with("faculty")
    }
}

pub mod dashboard {
    use super::*;
    use rollcall_models::Role;

    pub fn all() -> QueryKey {
        QueryKey::root("dashboard")
    }

    pub fn stats(role: Role) -> QueryKey {
        all().with("stats").with(role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_models::{CourseId, DepartmentFilters, DepartmentId, UserId};

    #[test]
    fn test_detail_key_sits_under_resource() {
        let key = departments::detail(&DepartmentId::from("d1"));
        assert_eq!(key.to_string(), "departments:detail:d1");
        assert!(key.starts_with(&departments::all()));
        assert!(!key.starts_with(&departments::lists()));
    }

    #[test]
    fn test_empty_filters_share_the_plain_list_key() {
        assert_eq!(departments::list(&DepartmentFilters::default()), departments::lists());
    }

    #[test]
    fn test_filtered_list_is_under_lists() {
        let filters = DepartmentFilters {
            search: Some("comp".to_string()),
            is_active: None,
        };
        let key = departments::list(&filters);
        assert!(key.starts_with(&departments::lists()));
        assert_ne!(key, departments::lists());
        assert_eq!(key, departments::list(&filters.clone()));
    }

    #[test]
    fn test_hash_filters_consistency() {
        let filters = ("test", 123, true);
        let hash1 = hash_filters(&filters);
        let hash2 = hash_filters(&filters);
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 16);
        assert_ne!(hash1, hash_filters(&("test", 124, true)));
    }

    #[test]
    fn test_student_attendance_key_distinguishes_course_filter() {
        let student = UserId::from("u1");
        let all_courses = attendance::student(&student, None);
        let one_course = attendance::student(&student, Some(&CourseId::from("c1")));
        assert_ne!(all_courses, one_course);
        assert!(one_course.starts_with(&attendance::all()));
    }

    #[test]
    fn test_user_keys_share_root() {
        assert!(users::students().starts_with(&users::all()));
        assert!(users::faculty().starts_with(&users::all()));
    }
}
