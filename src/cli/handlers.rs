use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use rollcall_auth::{GuardDecision, navigation_for, resolve};
use rollcall_core::{ClientError, Notification};
use rollcall_models::{
    AttendanceRecord, ClassSession, Coordinates, Course, CourseFilters, CreateCourseRequest,
    CreateDepartmentRequest, CreateSessionRequest, DashboardStats, Department, DepartmentFilters,
    DepartmentId, EnrollmentRequest, FacultyAssignmentRequest, LoginRequest, RegisterRequest, Role,
    SessionFilters, UpdateCourseRequest, UpdateDepartmentRequest, UpdateProfileRequest,
    UpdateSessionRequest, UpdateUserRequest, User, UserFilters,
};
use serde::Serialize;

use super::prompt;
use super::{
    AnalyticsCommand, AttendanceCommand, Cli, Commands, CourseCommand, DepartmentCommand,
    SessionCommand, UserCommand,
};
use crate::modules::{attendance, courses, dashboard, departments, sessions, users};
use crate::scanner::{FixedLocation, ScanFlow, ScanState};
use crate::state::AppContext;

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Runs one parsed command against the context.
pub async fn run(ctx: &AppContext, cli: Cli) -> Result<()> {
    if let Some(location) = cli.command.route() {
        check_access(ctx, location)?;
    }

    let out = Output { json: cli.json };
    match cli.command {
        Commands::Login { email, password } => handle_login(ctx, email, password).await,
        Commands::Register {
            first_name,
            last_name,
            email,
            role,
            student_id,
            employee_id,
            department,
            phone,
        } => {
            let request = register_form(
                first_name,
                last_name,
                email,
                role,
                student_id,
                employee_id,
                department,
                phone,
            )?;
            let user = ctx.register(request).await?;
            println!("   Name: {}  Role: {}", user.full_name(), user.role);
            Ok(())
        }
        Commands::Logout => {
            ctx.logout().await;
            Ok(())
        }
        Commands::Whoami => handle_whoami(ctx, &out),
        Commands::Profile {
            first_name,
            last_name,
            phone,
        } => {
            let request = UpdateProfileRequest {
                first_name,
                last_name,
                phone_number: phone,
                profile_picture: None,
            };
            let user = ctx.session.update_profile(&ctx.api, request).await?;
            out.emit(&user, print_user)
        }
        Commands::Departments(command) => handle_departments(ctx, &out, command).await,
        Commands::Courses(command) => handle_courses(ctx, &out, command).await,
        Commands::Sessions(command) => handle_sessions(ctx, &out, command).await,
        Commands::Users(command) => handle_users(ctx, &out, command).await,
        Commands::Attendance(command) => handle_attendance(ctx, &out, command).await,
        Commands::Scan { payload, lat, lng } => handle_scan(ctx, &payload, lat, lng).await,
        Commands::Dashboard { watch } => handle_dashboard(ctx, &out, watch).await,
        Commands::Analytics(command) => handle_analytics(ctx, &out, command).await,
        Commands::Theme { theme } => {
            let theme = match theme {
                Some(theme) => {
                    ctx.theme.set(theme).await?;
                    theme
                }
                None => ctx.theme.toggle().await?,
            };
            ctx.notifier
                .notify(Notification::info(format!("Theme: {}", theme)));
            Ok(())
        }
    }
}

fn check_access(ctx: &AppContext, location: &str) -> Result<()> {
    match ctx.guard(location) {
        GuardDecision::Render => Ok(()),
        GuardDecision::Loading => bail!("Session is still loading, try again"),
        GuardDecision::RedirectToLogin { .. } => {
            bail!("Not signed in. Run `rollcall login` first")
        }
        GuardDecision::RedirectToLanding => {
            bail!("Your role cannot open {}", resolve(location).label)
        }
    }
}

async fn handle_login(
    ctx: &AppContext,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = prompt::text(email, "Email address")?;
    let password = prompt::password(password)?;

    let user = ctx.login(LoginRequest::new(email, password)).await?;
    println!("   Name: {}  Role: {}", user.full_name(), user.role);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn register_form(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    role: Option<Role>,
    student_id: Option<String>,
    employee_id: Option<String>,
    department: Option<DepartmentId>,
    phone: Option<String>,
) -> Result<RegisterRequest> {
    let first_name = prompt::text(first_name, "First name")?;
    let last_name = prompt::text(last_name, "Last name")?;
    let email = prompt::text(email, "Email address")?;
    let role = prompt::role(role)?;

    let (student_id, employee_id) = if role.is_staff() {
        (None, Some(prompt::text(employee_id, "Employee ID")?))
    } else {
        (Some(prompt::text(student_id, "Student ID")?), None)
    };
    let (password, confirm_password) = prompt::new_password()?;

    Ok(RegisterRequest {
        first_name,
        last_name,
        email,
        password,
        confirm_password,
        role,
        department_id: department,
        phone_number: phone,
        student_id,
        employee_id,
    })
}

fn handle_whoami(ctx: &AppContext, out: &Output) -> Result<()> {
    let state = ctx.session.state();
    let user = state.user.ok_or(ClientError::AuthExpired)?;
    out.emit(&user, |user| {
        print_user(user);
        let sections: Vec<&str> = navigation_for(user.role)
            .into_iter()
            .map(|route| route.label)
            .collect();
        println!("   Sections: {}", sections.join(", "));
    })
}

async fn handle_departments(
    ctx: &AppContext,
    out: &Output,
    command: DepartmentCommand,
) -> Result<()> {
    match command {
        DepartmentCommand::List { search, active } => {
            let filters = DepartmentFilters {
                search,
                is_active: active,
            };
            let list = departments::queries::list(ctx, filters).await?;
            out.emit(&list, |list| list.iter().for_each(print_department))
        }
        DepartmentCommand::Show { id } => {
            let department = departments::queries::get(ctx, &id)
                .await?
                .ok_or_else(|| anyhow!("Department id is required"))?;
            out.emit(&department, print_department)
        }
        DepartmentCommand::Create {
            name,
            code,
            description,
        } => {
            let request = CreateDepartmentRequest {
                name: prompt::text(name, "Name")?,
                code: prompt::text(code, "Code")?,
                description,
            };
            let department = departments::queries::create(ctx, request).await?;
            success(ctx, "Department created successfully!");
            out.emit(&department, print_department)
        }
        DepartmentCommand::Update {
            id,
            name,
            code,
            description,
            active,
        } => {
            let request = UpdateDepartmentRequest {
                name,
                code,
                description,
                is_active: active,
            };
            let department = departments::queries::update(ctx, &id, request).await?;
            success(ctx, "Department updated successfully!");
            out.emit(&department, print_department)
        }
        DepartmentCommand::Delete { id } => {
            departments::queries::delete(ctx, &id).await?;
            success(ctx, "Department deleted successfully!");
            Ok(())
        }
    }
}

async fn handle_courses(ctx: &AppContext, out: &Output, command: CourseCommand) -> Result<()> {
    match command {
        CourseCommand::List {
            search,
            department,
            semester,
        } => {
            let filters = CourseFilters {
                search,
                department_id: department,
                semester,
            };
            let list = courses::queries::list(ctx, filters).await?;
            out.emit(&list, |list| list.iter().for_each(print_course))
        }
        CourseCommand::Show { id } => {
            let course = courses::queries::get(ctx, &id)
                .await?
                .ok_or_else(|| anyhow!("Course id is required"))?;
            out.emit(&course, print_course)
        }
        CourseCommand::Create {
            name,
            code,
            credits,
            semester,
            department,
        } => {
            let request = CreateCourseRequest {
                name: prompt::text(name, "Name")?,
                code: prompt::text(code, "Code")?,
                credits: prompt::number(credits, "Credits (1-6)")?,
                semester: prompt::number(semester, "Semester (1-8)")?,
                department_id: prompt::text(department.map(String::from), "Department ID")?
                    .into(),
            };
            let course = courses::queries::create(ctx, request).await?;
            success(ctx, "Course created successfully!");
            out.emit(&course, print_course)
        }
        CourseCommand::Update {
            id,
            name,
            code,
            credits,
            semester,
            active,
        } => {
            let request = UpdateCourseRequest {
                name,
                code,
                credits,
                department_id: None,
                semester,
                is_active: active,
            };
            let course = courses::queries::update(ctx, &id, request).await?;
            success(ctx, "Course updated successfully!");
            out.emit(&course, print_course)
        }
        CourseCommand::Delete { id } => {
            courses::queries::delete(ctx, &id).await?;
            success(ctx, "Course deleted successfully!");
            Ok(())
        }
        CourseCommand::Enroll { course, student } => {
            let request = EnrollmentRequest {
                course_id: course,
                student_id: student,
            };
            courses::queries::enroll_student(ctx, request).await?;
            success(ctx, "Student enrolled successfully!");
            Ok(())
        }
        CourseCommand::AssignFaculty { course, faculty } => {
            let request = FacultyAssignmentRequest {
                course_id: course,
                faculty_id: faculty,
            };
            courses::queries::assign_faculty(ctx, request).await?;
            success(ctx, "Faculty assigned successfully!");
            Ok(())
        }
    }
}

async fn handle_sessions(ctx: &AppContext, out: &Output, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::List {
            course,
            status,
            kind,
        } => {
            let filters = SessionFilters {
                course_id: course,
                status: status.map(Into::into),
                session_type: kind.map(Into::into),
            };
            let list = sessions::queries::list(ctx, filters).await?;
            out.emit(&list, |list| list.iter().for_each(print_session))
        }
        SessionCommand::Show { id } => {
            let session = sessions::queries::get(ctx, &id)
                .await?
                .ok_or_else(|| anyhow!("Session id is required"))?;
            out.emit(&session, print_session)
        }
        SessionCommand::Create {
            title,
            course,
            kind,
            start,
            end,
            description,
            location,
            meet_link,
        } => {
            let request = CreateSessionRequest {
                title,
                description,
                session_type: kind.into(),
                course_id: course,
                scheduled_start_time: start,
                scheduled_end_time: end,
                location,
                google_meet_link: meet_link,
            };
            let session = sessions::queries::create(ctx, request).await?;
            success(ctx, "Session created successfully!");
            out.emit(&session, print_session)
        }
        SessionCommand::Update {
            id,
            title,
            start,
            end,
            location,
            meet_link,
        } => {
            let request = UpdateSessionRequest {
                title,
                scheduled_start_time: start,
                scheduled_end_time: end,
                location,
                google_meet_link: meet_link,
                ..Default::default()
            };
            let session = sessions::queries::update(ctx, &id, request).await?;
            success(ctx, "Session updated successfully!");
            out.emit(&session, print_session)
        }
        SessionCommand::Delete { id } => {
            sessions::queries::delete(ctx, &id).await?;
            success(ctx, "Session deleted successfully!");
            Ok(())
        }
        SessionCommand::Qr { id, lat, lng } => {
            let location = lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng));
            let qr = sessions::queries::generate_qr(ctx, &id, location).await?;
            success(ctx, "QR code generated successfully!");
            out.emit(&qr, |qr| {
                println!("{}", qr.qr_code);
                if let Some(expires_at) = qr.expires_at {
                    println!("   Expires: {}", expires_at.to_rfc3339());
                }
            })
        }
        SessionCommand::Join { id } => {
            sessions::queries::join(ctx, &id).await?;
            success(ctx, "Joined session successfully!");
            Ok(())
        }
        SessionCommand::Leave { id } => {
            sessions::queries::leave(ctx, &id).await?;
            success(ctx, "Left session successfully!");
            Ok(())
        }
        SessionCommand::Status { id, watch: false } => {
            let status = sessions::queries::attendance_status(ctx, &id)
                .await?
                .ok_or_else(|| anyhow!("Session id is required"))?;
            out.emit(&status, |status| {
                println!("   Present: {}", if status.is_present { "yes" } else { "no" });
            })
        }
        SessionCommand::Status { id, watch: true } => {
            let mut observer = sessions::queries::observe_attendance_status(ctx, &id)
                .ok_or_else(|| anyhow!("Session id is required"))?;
            loop {
                let status = observer.settled().await?;
                out.emit(&status, |status| {
                    println!("   Present: {}", if status.is_present { "yes" } else { "no" });
                })?;
                tokio::select! {
                    changed = observer.changed() => changed?,
                    _ = tokio::signal::ctrl_c() => return Ok(()),
                }
            }
        }
    }
}

async fn handle_users(ctx: &AppContext, out: &Output, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::List {
            search,
            role,
            department,
        } => {
            let filters = UserFilters {
                search,
                role,
                department_id: department,
            };
            let list = users::queries::list(ctx, filters).await?;
            out.emit(&list, |list| list.iter().for_each(print_user))
        }
        UserCommand::Students => {
            let list = users::queries::students(ctx).await?;
            out.emit(&list, |list| list.iter().for_each(print_user))
        }
        UserCommand::Faculty => {
            let list = users::queries::faculty(ctx).await?;
            out.emit(&list, |list| list.iter().for_each(print_user))
        }
        UserCommand::Create {
            first_name,
            last_name,
            email,
            role,
            student_id,
            employee_id,
            department,
        } => {
            let request = register_form(
                first_name,
                last_name,
                email,
                role,
                student_id,
                employee_id,
                department,
                None,
            )?;
            let user = users::queries::create(ctx, request).await?;
            success(ctx, "User created successfully!");
            out.emit(&user, print_user)
        }
        UserCommand::Update {
            id,
            first_name,
            last_name,
            email,
            department,
        } => {
            let request = UpdateUserRequest {
                first_name,
                last_name,
                email,
                department_id: department,
                ..Default::default()
            };
            let user = users::queries::update(ctx, &id, request).await?;
            success(ctx, "User updated successfully!");
            out.emit(&user, print_user)
        }
        UserCommand::Delete { id } => {
            users::queries::delete(ctx, &id).await?;
            success(ctx, "User deleted successfully!");
            Ok(())
        }
    }
}

async fn handle_attendance(
    ctx: &AppContext,
    out: &Output,
    command: AttendanceCommand,
) -> Result<()> {
    match command {
        AttendanceCommand::Recent => {
            let records = attendance::queries::recent(ctx).await?;
            out.emit(&records, |records| records.iter().for_each(print_record))
        }
        AttendanceCommand::Student { id, course } => {
            let id = match id {
                Some(id) => id,
                None => current_user(ctx)?.id,
            };
            let records = attendance::queries::student(ctx, &id, course.as_ref())
                .await?
                .unwrap_or_default();
            out.emit(&records, |records| records.iter().for_each(print_record))
        }
        AttendanceCommand::Session { id } => {
            let records = attendance::queries::session(ctx, &id)
                .await?
                .unwrap_or_default();
            out.emit(&records, |records| records.iter().for_each(print_record))
        }
        AttendanceCommand::Online { session, duration } => {
            let record = attendance::queries::mark_online(ctx, &session, duration).await?;
            success(ctx, "Attendance marked successfully!");
            out.emit(&record, print_record)
        }
    }
}

async fn handle_scan(
    ctx: &AppContext,
    payload: &str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<()> {
    let location = match lat.zip(lng) {
        Some((lat, lng)) => FixedLocation::at(lat, lng),
        None => FixedLocation::unavailable(),
    };
    let flow = ScanFlow::new(ctx.clone(), Arc::new(location));
    flow.start();

    match flow.decoded(payload).await {
        ScanState::Success { session_id } => {
            println!("   Session: {}", session_id);
            Ok(())
        }
        ScanState::Failed { message } => Err(anyhow!(message)),
        other => Err(anyhow!("Scan did not complete ({:?})", other)),
    }
}

async fn handle_dashboard(ctx: &AppContext, out: &Output, watch: bool) -> Result<()> {
    if !watch {
        let stats = dashboard::queries::stats(ctx).await?;
        return out.emit(&stats, print_dashboard);
    }

    let mut observer = dashboard::queries::observe_stats(ctx)?;
    loop {
        let stats = observer.settled().await?;
        out.emit(&stats, print_dashboard)?;
        tokio::select! {
            changed = observer.changed() => changed?,
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

async fn handle_analytics(ctx: &AppContext, out: &Output, command: AnalyticsCommand) -> Result<()> {
    match command {
        AnalyticsCommand::Course { id } => {
            let analytics = courses::queries::analytics(ctx, &id)
                .await?
                .context("Course id is required")?;
            out.emit(&analytics, |a| {
                println!("{} {}", a.course_code, a.course_name);
                println!(
                    "   Sessions: {} ({} completed)  Average: {:.2}%",
                    a.total_sessions, a.completed_sessions, a.average_attendance
                );
                for entry in &a.low_attendance_students {
                    println!(
                        "   Low: {} {} {:.2}%",
                        entry.student.first_name,
                        entry.student.last_name,
                        entry.attendance_percentage
                    );
                }
            })
        }
        AnalyticsCommand::Department { id } => {
            let analytics = departments::queries::analytics(ctx, &id)
                .await?
                .context("Department id is required")?;
            out.emit(&analytics, |a| {
                println!("{}", a.department_name);
                println!(
                    "   Courses: {}  Students: {}  Faculty: {}  Average: {:.2}%",
                    a.total_courses, a.total_students, a.total_faculty, a.average_attendance
                );
                for share in &a.course_wise_attendance {
                    println!(
                        "   {} {:.2}% over {} sessions",
                        share.course.code, share.average_attendance, share.total_sessions
                    );
                }
            })
        }
        AnalyticsCommand::Student { id } => {
            let analytics = attendance::queries::analytics(ctx, &id)
                .await?
                .context("Student id is required")?;
            out.emit(&analytics, |a| {
                println!(
                    "{} {}  Overall: {:.2}%",
                    a.student.first_name, a.student.last_name, a.overall_attendance
                );
                for course in &a.course_wise_attendance {
                    println!(
                        "   {} {}/{} ({:.2}%)",
                        course.course.code,
                        course.attendance_count,
                        course.total_sessions,
                        course.percentage
                    );
                }
            })
        }
    }
}

fn current_user(ctx: &AppContext) -> Result<User> {
    Ok(ctx.session.state().user.ok_or(ClientError::AuthExpired)?)
}

fn success(ctx: &AppContext, message: &str) {
    ctx.notifier.notify(Notification::success(message));
}

fn print_user(user: &User) {
    let identifier = user
        .student_id
        .as_deref()
        .or(user.employee_id.as_deref())
        .unwrap_or("-");
    println!(
        "{:<24} {:<8} {:<10} {} ({})",
        user.id,
        user.role,
        identifier,
        user.full_name(),
        user.email
    );
}

fn print_department(department: &Department) {
    println!(
        "{:<24} {:<6} {}{}",
        department.id,
        department.code,
        department.name,
        if department.is_active { "" } else { " (inactive)" }
    );
}

fn print_course(course: &Course) {
    println!(
        "{:<24} {:<8} {} [{} credits, semester {}, {}]",
        course.id,
        course.code,
        course.name,
        course.credits,
        course.semester,
        course.department.name
    );
}

fn print_session(session: &ClassSession) {
    println!(
        "{:<24} {:<10} {} {} ({}) {}/{}",
        session.id,
        session.status.as_str(),
        session.scheduled_start_time.format("%Y-%m-%d %H:%M"),
        session.title,
        session.course.code,
        session.attendance_count,
        session.total_enrolled
    );
}

fn print_record(record: &AttendanceRecord) {
    println!(
        "{} {} {} - {} ({:?}, {:?})",
        record.marked_at.format("%Y-%m-%d %H:%M"),
        record.student.first_name,
        record.student.last_name,
        record.session.title,
        record.method,
        record.status
    );
}

fn print_dashboard(stats: &DashboardStats) {
    println!(
        "Students: {}  Faculty: {}  Courses: {}  Sessions: {} ({} today)",
        stats.total_students,
        stats.total_faculty,
        stats.total_courses,
        stats.total_sessions,
        stats.today_sessions
    );
    println!("Average attendance: {:.2}%", stats.average_attendance);
    for session in &stats.recent_sessions {
        println!(
            "   {} {} ({}) {:.1}%",
            session.time.format("%Y-%m-%d %H:%M"),
            session.title,
            session.course,
            session.attendance_rate
        );
    }
}

/// Prints a failed command's error unless the HTTP wrapper already
/// notified it. Validation failures list every field.
pub fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<ClientError>() {
        Some(
            ClientError::Network(_)
            | ClientError::Http { .. }
            | ClientError::Domain { .. }
            | ClientError::AuthExpired,
        ) => {}
        Some(ClientError::Validation(fields)) => {
            eprintln!("❌ Please fix the highlighted fields:");
            for (field, message) in fields.iter() {
                eprintln!("   {}: {}", field, message);
            }
        }
        _ => eprintln!("❌ {:#}", err),
    }
}
