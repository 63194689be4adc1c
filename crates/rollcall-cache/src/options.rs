//! Per-query cache options.

use std::time::Duration;

/// Stale times and polling intervals per resource.
pub mod stale_times {
    use std::time::Duration;

    const MINUTE: u64 = 60;

    pub const DEFAULT: Duration = Duration::from_secs(5 * MINUTE);

    pub const DEPARTMENT_LIST: Duration = Duration::from_secs(10 * MINUTE);
    pub const DEPARTMENT_DETAIL: Duration = Duration::from_secs(5 * MINUTE);
    pub const DEPARTMENT_ANALYTICS: Duration = Duration::from_secs(5 * MINUTE);

    pub const COURSES: Duration = Duration::from_secs(5 * MINUTE);
    pub const COURSE_ANALYTICS: Duration = Duration::from_secs(2 * MINUTE);

    pub const SESSIONS: Duration = Duration::from_secs(2 * MINUTE);
    pub const ATTENDANCE_STATUS: Duration = Duration::from_secs(30);
    pub const ATTENDANCE_STATUS_POLL: Duration = Duration::from_secs(30);

    pub const STUDENT_ATTENDANCE: Duration = Duration::from_secs(2 * MINUTE);
    pub const SESSION_ATTENDANCE: Duration = Duration::from_secs(MINUTE);
    pub const STUDENT_ANALYTICS: Duration = Duration::from_secs(5 * MINUTE);
    pub const RECENT_ATTENDANCE: Duration = Duration::from_secs(MINUTE);

    pub const USERS: Duration = Duration::from_secs(5 * MINUTE);

    pub const DASHBOARD: Duration = Duration::from_secs(2 * MINUTE);
    pub const DASHBOARD_POLL: Duration = Duration::from_secs(5 * MINUTE);

    /// How long an unobserved entry outlives its last use.
    pub const GC: Duration = Duration::from_secs(5 * MINUTE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Age after which cached data is refetched on the next read.
    pub stale_time: Duration,
    /// Silent retries after a transient failure; `None` uses the client default.
    pub retry: Option<u32>,
    /// Refetch on this interval while the query is observed.
    pub refetch_interval: Option<Duration>,
    /// Unobserved entries idle for longer than this are dropped.
    pub gc_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::stale(stale_times::DEFAULT)
    }
}

impl QueryOptions {
    pub const fn stale(stale_time: Duration) -> Self {
        Self {
            stale_time,
            retry: None,
            refetch_interval: None,
            gc_time: stale_times::GC,
        }
    }

    pub const fn with_retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    pub const fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = Some(interval);
        self
    }

    pub const fn with_gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }
}
