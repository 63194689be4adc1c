//! Route guard.
//!
//! Decides what a protected view shows for the current session:
//!
//! 1. session still loading -> [`GuardDecision::Loading`]
//! 2. no authenticated user -> [`GuardDecision::RedirectToLogin`], carrying
//!    the requested location so login can return there
//! 3. role not among the required roles -> [`GuardDecision::RedirectToLanding`]
//! 4. otherwise -> [`GuardDecision::Render`]
//!
//! An empty role list means any authenticated user may enter.

use rollcall_models::Role;

use crate::routes::resolve;
use crate::session::AuthState;

/// Login entry point.
pub const LOGIN_PATH: &str = "/";

/// Where users land after login or when a route is not for them.
pub const LANDING_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    RedirectToLogin { from: String },
    RedirectToLanding,
    Render,
}

impl GuardDecision {
    /// Path to navigate to, if the decision is a redirect.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin { .. } => Some(LOGIN_PATH),
            GuardDecision::RedirectToLanding => Some(LANDING_PATH),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }

    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Plain set membership; an empty requirement admits every role.
pub fn check_any_role(user_role: Role, required: &[Role]) -> bool {
    required.is_empty() || required.contains(&user_role)
}

pub fn guard(state: &AuthState, required_roles: &[Role], location: &str) -> GuardDecision {
    if state.is_loading {
        return GuardDecision::Loading;
    }

    let user = match (&state.user, state.is_authenticated) {
        (Some(user), true) => user,
        _ => {
            return GuardDecision::RedirectToLogin {
                from: location.to_string(),
            };
        }
    };

    if !check_any_role(user.role, required_roles) {
        tracing::debug!(
            location,
            role = %user.role,
            required = ?required_roles,
            "route denied for role"
        );
        return GuardDecision::RedirectToLanding;
    }

    GuardDecision::Render
}

/// Guards a path using the application route table.
pub fn guard_route(state: &AuthState, location: &str) -> GuardDecision {
    guard(state, resolve(location).roles, location)
}
