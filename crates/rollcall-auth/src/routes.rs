//! Application route table.

use rollcall_models::Role;

use crate::guard::LANDING_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub label: &'static str,
    /// Roles allowed in; empty means every signed-in user.
    pub roles: &'static [Role],
}

const STAFF: &[Role] = &[Role::Admin, Role::Faculty];

/// Every guarded route, in navigation order.
pub const ROUTES: &[Route] = &[
    Route {
        path: "/dashboard",
        label: "Dashboard",
        roles: &[],
    },
    Route {
        path: "/departments",
        label: "Departments",
        roles: &[Role::Admin],
    },
    Route {
        path: "/courses",
        label: "Courses",
        roles: STAFF,
    },
    Route {
        path: "/users",
        label: "Users",
        roles: &[Role::Admin],
    },
    Route {
        path: "/timetable",
        label: "Timetable",
        roles: &[],
    },
    Route {
        path: "/sessions",
        label: "Sessions",
        roles: &[],
    },
    Route {
        path: "/attendance",
        label: "Attendance",
        roles: &[],
    },
    Route {
        path: "/qr-scanner",
        label: "QR Scanner",
        roles: &[Role::Student],
    },
    Route {
        path: "/analytics",
        label: "Analytics",
        roles: STAFF,
    },
    Route {
        path: "/profile",
        label: "Profile",
        roles: &[],
    },
];

impl Route {
    pub fn allows(&self, role: Role) -> bool {
        self.roles.is_empty() || self.roles.contains(&role)
    }
}

/// Finds the route for a path. Unknown paths, including the bare root,
/// resolve to the dashboard.
pub fn resolve(path: &str) -> &'static Route {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');

    ROUTES
        .iter()
        .find(|r| r.path == trimmed || trimmed.starts_with(&format!("{}/", r.path)))
        .or_else(|| ROUTES.iter().find(|r| r.path == LANDING_PATH))
        .unwrap_or(&ROUTES[0])
}

/// Routes shown in the navigation for a role.
pub fn navigation_for(role: Role) -> Vec<&'static Route> {
    ROUTES.iter().filter(|r| r.allows(role)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(role: Role) -> Vec<&'static str> {
        navigation_for(role).into_iter().map(|r| r.path).collect()
    }

    #[test]
    fn test_student_navigation() {
        assert_eq!(
            paths(Role::Student),
            vec![
                "/dashboard",
                "/timetable",
                "/sessions",
                "/attendance",
                "/qr-scanner",
                "/profile"
            ]
        );
    }

    #[test]
    fn test_faculty_sees_courses_and_analytics_only_among_staff_routes() {
        let faculty = paths(Role::Faculty);
        assert!(faculty.contains(&"/courses"));
        assert!(faculty.contains(&"/analytics"));
        assert!(!faculty.contains(&"/departments"));
        assert!(!faculty.contains(&"/users"));
        assert!(!faculty.contains(&"/qr-scanner"));
    }

    #[test]
    fn test_admin_sees_everything_but_scanner() {
        let admin = paths(Role::Admin);
        assert_eq!(admin.len(), ROUTES.len() - 1);
        assert!(!admin.contains(&"/qr-scanner"));
    }

    #[test]
    fn test_resolve_unknown_paths_to_dashboard() {
        assert_eq!(resolve("/nowhere").path, "/dashboard");
        assert_eq!(resolve("/").path, "/dashboard");
        assert_eq!(resolve("/sessions/s1").path, "/sessions");
        assert_eq!(resolve("/users?role=STUDENT").path, "/users");
    }
}
