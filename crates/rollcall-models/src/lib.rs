//! # Rollcall Models
//!
//! Domain models and DTOs exchanged with the attendance backend.
//!
//! Everything here is camelCase on the wire. Request DTOs carry `validator`
//! rules so forms are checked before any request is sent.
//!
//! # Modules
//!
//! - [`ids`]: typed id newtypes over the backend's opaque string ids
//! - [`roles`]: the three fixed access levels
//! - [`users`], [`auth`]: accounts, login/register/refresh payloads
//! - [`departments`], [`courses`], [`sessions`], [`attendance`]: resources
//! - [`analytics`], [`dashboard`]: read-only aggregate views
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::departments::CreateDepartmentRequest;
//! use validator::Validate;
//!
//! let request = CreateDepartmentRequest::new("Computer Science", "CS");
//! request.validate()?;
//! ```

pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod ids;
pub mod roles;
pub mod sessions;
pub mod users;
mod validation;

// Re-export commonly used types at crate root for convenience
pub use ids::{AttendanceId, CourseId, DepartmentId, SessionId, UserId};
pub use roles::Role;
pub use users::{UpdateUserRequest, User, UserFilters};

pub use auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    UpdateProfileRequest,
};

pub use departments::{
    CreateDepartmentRequest, Department, DepartmentFilters, DepartmentSummary,
    UpdateDepartmentRequest,
};

pub use courses::{
    Course, CourseFilters, CreateCourseRequest, EnrollmentRequest, FacultyAssignmentRequest,
    UpdateCourseRequest,
};

pub use sessions::{
    ClassSession, CreateSessionRequest, GeneratedQr, SessionAttendanceStatus, SessionFilters,
    SessionStatus, SessionType, UpdateSessionRequest,
};

pub use attendance::{
    AttendanceMethod, AttendanceRecord, AttendanceStatus, Coordinates, MarkOnlineRequest,
    MarkQrRequest,
};

pub use analytics::{CourseAttendanceAnalytics, DepartmentAnalytics, StudentAnalytics};
pub use dashboard::{DashboardStats, RecentSession, TrendPoint};
