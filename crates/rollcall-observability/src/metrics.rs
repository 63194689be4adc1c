//! Client-side counters.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

use metrics::counter;

pub fn track_login_success(role: &str) {
    counter!("auth_login_total", "outcome" => "success", "role" => role.to_string()).increment(1);
}

pub fn track_login_failure(reason: &str) {
    counter!("auth_login_total", "outcome" => "failure", "reason" => reason.to_string())
        .increment(1);
}

/// `outcome` is `success` or `failure`.
pub fn track_token_refresh(outcome: &str) {
    counter!("auth_token_refresh_total", "outcome" => outcome.to_string()).increment(1);
}

pub fn track_session_expired() {
    counter!("auth_session_expired_total").increment(1);
}

pub fn track_attendance_marked(method: &str, outcome: &str) {
    counter!(
        "attendance_marked_total",
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
