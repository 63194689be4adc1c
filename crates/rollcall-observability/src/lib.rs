//! Rollcall Observability
//!
//! Logging setup and client-side metrics:
//! - Console logging filtered by `RUST_LOG` or `LOG_LEVEL`
//! - A daily rolling JSON log file when `LOG_DIR` is set
//! - Counters for logins, refreshes and attendance marking
//!
//! The file layer and metrics are compiled in with the `observability`
//! feature (on by default). Without it only console logging remains.
//!
//! # Examples
//!
//! ```no_run
//! use rollcall_config::LoggingConfig;
//! use rollcall_observability::init_tracing;
//!
//! let _guard = init_tracing(&LoggingConfig::from_env());
//! ```

pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use logging::{LogGuard, build_filter, init_tracing};

#[cfg(feature = "observability")]
pub use metrics::{
    track_attendance_marked, track_login_failure, track_login_success, track_session_expired,
    track_token_refresh,
};

// No-op counters when the feature is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_token_refresh(_outcome: &str) {}
    pub fn track_session_expired() {}
    pub fn track_attendance_marked(_method: &str, _outcome: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
