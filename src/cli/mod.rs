//! Terminal front-end.
//!
//! Every command that shows protected data is gated through the route
//! guard with the route it corresponds to in the web dashboard.

mod handlers;
mod notifier;
mod prompt;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use rollcall_models::{
    CourseId, DepartmentId, Role, SessionId, SessionStatus, SessionType, UserId,
};

use crate::stores::Theme;

pub use handlers::{report_error, run};
pub use notifier::ConsoleNotifier;

#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(about = "Rollcall - attendance management from the terminal", long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in (prompts for anything not given)
    Login {
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'r', long)]
        role: Option<Role>,

        #[arg(long)]
        student_id: Option<String>,

        #[arg(long)]
        employee_id: Option<String>,

        #[arg(long)]
        department: Option<DepartmentId>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user and the sections they can open
    Whoami,
    /// Update your own profile
    Profile {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Manage departments
    #[command(subcommand)]
    Departments(DepartmentCommand),
    /// Manage courses
    #[command(subcommand)]
    Courses(CourseCommand),
    /// Manage class sessions
    #[command(subcommand)]
    Sessions(SessionCommand),
    /// Manage user accounts
    #[command(subcommand)]
    Users(UserCommand),
    /// Attendance records
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Submit a scanned QR payload to mark attendance
    Scan {
        /// Decoded QR text: a token or a JSON payload
        payload: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Dashboard summary
    Dashboard {
        /// Keep refreshing until interrupted
        #[arg(short = 'w', long)]
        watch: bool,
    },
    /// Attendance analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    /// Show or change the colour theme
    Theme {
        /// Set explicitly; omit to toggle
        theme: Option<Theme>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DepartmentCommand {
    List {
        #[arg(short = 's', long)]
        search: Option<String>,

        /// Only active (true) or inactive (false) departments
        #[arg(long)]
        active: Option<bool>,
    },
    Show {
        id: DepartmentId,
    },
    Create {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'c', long)]
        code: Option<String>,

        #[arg(short = 'd', long)]
        description: Option<String>,
    },
    Update {
        id: DepartmentId,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'c', long)]
        code: Option<String>,

        #[arg(short = 'd', long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: DepartmentId,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommand {
    List {
        #[arg(short = 's', long)]
        search: Option<String>,

        #[arg(long)]
        department: Option<DepartmentId>,

        #[arg(long)]
        semester: Option<u8>,
    },
    Show {
        id: CourseId,
    },
    Create {
        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'c', long)]
        code: Option<String>,

        #[arg(long)]
        credits: Option<u8>,

        #[arg(long)]
        semester: Option<u8>,

        #[arg(long)]
        department: Option<DepartmentId>,
    },
    Update {
        id: CourseId,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'c', long)]
        code: Option<String>,

        #[arg(long)]
        credits: Option<u8>,

        #[arg(long)]
        semester: Option<u8>,

        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: CourseId,
    },
    /// Enroll a student in a course
    Enroll {
        course: CourseId,
        student: UserId,
    },
    /// Assign a faculty member to a course
    AssignFaculty {
        course: CourseId,
        faculty: UserId,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SessionKind {
    Offline,
    Online,
}

impl From<SessionKind> for SessionType {
    fn from(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Offline => SessionType::Offline,
            SessionKind::Online => SessionType::Online,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusFilter {
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl From<StatusFilter> for SessionStatus {
    fn from(status: StatusFilter) -> Self {
        match status {
            StatusFilter::Scheduled => SessionStatus::Scheduled,
            StatusFilter::Active => SessionStatus::Active,
            StatusFilter::Completed => SessionStatus::Completed,
            StatusFilter::Cancelled => SessionStatus::Cancelled,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    List {
        #[arg(long)]
        course: Option<CourseId>,

        #[arg(long, value_enum)]
        status: Option<StatusFilter>,

        #[arg(long = "type", value_enum)]
        kind: Option<SessionKind>,
    },
    Show {
        id: SessionId,
    },
    Create {
        #[arg(short = 't', long)]
        title: String,

        #[arg(long)]
        course: CourseId,

        #[arg(long = "type", value_enum, default_value = "offline")]
        kind: SessionKind,

        /// RFC 3339 start time
        #[arg(long)]
        start: DateTime<Utc>,

        /// RFC 3339 end time
        #[arg(long)]
        end: DateTime<Utc>,

        #[arg(short = 'd', long)]
        description: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        meet_link: Option<String>,
    },
    Update {
        id: SessionId,

        #[arg(short = 't', long)]
        title: Option<String>,

        #[arg(long)]
        start: Option<DateTime<Utc>>,

        #[arg(long)]
        end: Option<DateTime<Utc>>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        meet_link: Option<String>,
    },
    Delete {
        id: SessionId,
    },
    /// Generate a fresh attendance QR code
    Qr {
        id: SessionId,

        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,
    },
    /// Join an online session
    Join {
        id: SessionId,
    },
    /// Leave an online session
    Leave {
        id: SessionId,
    },
    /// Whether you are marked present
    Status {
        id: SessionId,

        /// Keep polling until interrupted
        #[arg(short = 'w', long)]
        watch: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List {
        #[arg(short = 's', long)]
        search: Option<String>,

        #[arg(short = 'r', long)]
        role: Option<Role>,

        #[arg(long)]
        department: Option<DepartmentId>,
    },
    Students,
    Faculty,
    /// Create an account for someone else
    Create {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(short = 'r', long)]
        role: Option<Role>,

        #[arg(long)]
        student_id: Option<String>,

        #[arg(long)]
        employee_id: Option<String>,

        #[arg(long)]
        department: Option<DepartmentId>,
    },
    Update {
        id: UserId,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(long)]
        department: Option<DepartmentId>,
    },
    Delete {
        id: UserId,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// Latest attendance records
    Recent,
    /// A student's records; defaults to your own
    Student {
        id: Option<UserId>,

        #[arg(long)]
        course: Option<CourseId>,
    },
    /// Records for one session
    Session {
        id: SessionId,
    },
    /// Mark yourself present in an online session
    Online {
        session: SessionId,

        /// Minutes attended
        #[arg(long)]
        duration: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommand {
    Course { id: CourseId },
    Department { id: DepartmentId },
    Student { id: UserId },
}

impl Commands {
    /// Dashboard route the command is gated on; `None` for commands that
    /// work signed out.
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Commands::Login { .. }
            | Commands::Register { .. }
            | Commands::Logout
            | Commands::Theme { .. } => None,
            Commands::Whoami | Commands::Profile { .. } => Some("/profile"),
            Commands::Departments(_) => Some("/departments"),
            Commands::Courses(_) => Some("/courses"),
            Commands::Sessions(_) => Some("/sessions"),
            Commands::Users(_) => Some("/users"),
            Commands::Attendance(_) => Some("/attendance"),
            Commands::Scan { .. } => Some("/qr-scanner"),
            Commands::Dashboard { .. } => Some("/dashboard"),
            Commands::Analytics(_) => Some("/analytics"),
        }
    }
}
