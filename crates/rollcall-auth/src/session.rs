//! Auth session state.
//!
//! The state moves `anonymous -> authenticating -> authenticated ->
//! anonymous`. Every change goes through [`AuthState::reduce`], a pure
//! function, so the invariant "authenticated implies a user and a token" is
//! checked in one place.

use rollcall_models::{Role, User};
use serde::{Deserialize, Serialize};

/// Storage name of the persisted session.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

/// Storage name of the refresh token, kept apart from the session blob.
pub const REFRESH_TOKEN_KEY: &str = "refresh-token";

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// Login or registration request sent.
    Authenticating,
    Authenticated { user: User, token: String },
    AuthenticationFailed { message: String },
    LoggedOut,
    /// A 401 could not be recovered by refreshing the token.
    SessionExpired,
    ProfileUpdateStarted,
    ProfileUpdated { user: User },
    ProfileUpdateFailed { message: String },
    TokenRefreshed { token: String },
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::Authenticating => "authenticating",
            AuthEvent::Authenticated { .. } => "authenticated",
            AuthEvent::AuthenticationFailed { .. } => "authentication_failed",
            AuthEvent::LoggedOut => "logged_out",
            AuthEvent::SessionExpired => "session_expired",
            AuthEvent::ProfileUpdateStarted => "profile_update_started",
            AuthEvent::ProfileUpdated { .. } => "profile_updated",
            AuthEvent::ProfileUpdateFailed { .. } => "profile_update_failed",
            AuthEvent::TokenRefreshed { .. } => "token_refreshed",
        }
    }
}

impl AuthState {
    /// Applies one transition.
    pub fn reduce(self, event: AuthEvent) -> Self {
        match event {
            AuthEvent::Authenticating => Self {
                is_loading: true,
                error: None,
                ..self
            },
            AuthEvent::Authenticated { user, token } => Self {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
                is_loading: false,
                error: None,
            },
            // Fail closed: nothing of a previous session survives a failed login.
            AuthEvent::AuthenticationFailed { message } => Self {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: false,
                error: Some(message),
            },
            AuthEvent::LoggedOut => Self {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: false,
                error: None,
            },
            AuthEvent::SessionExpired => Self {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading: false,
                error: Some(SESSION_EXPIRED_MESSAGE.to_string()),
            },
            AuthEvent::ProfileUpdateStarted => Self {
                is_loading: true,
                error: None,
                ..self
            },
            AuthEvent::ProfileUpdated { user } if self.is_authenticated => Self {
                user: Some(user),
                is_loading: false,
                ..self
            },
            AuthEvent::ProfileUpdated { .. } => Self {
                is_loading: false,
                ..self
            },
            AuthEvent::ProfileUpdateFailed { message } => Self {
                is_loading: false,
                error: Some(message),
                ..self
            },
            AuthEvent::TokenRefreshed { token } if self.is_authenticated => Self {
                token: Some(token),
                ..self
            },
            AuthEvent::TokenRefreshed { .. } => self,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|r| roles.contains(&r))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_faculty(&self) -> bool {
        self.has_role(Role::Faculty)
    }

    pub fn is_student(&self) -> bool {
        self.has_role(Role::Student)
    }

    /// The subset of the state that survives a restart.
    pub fn persisted(&self) -> PersistedAuth {
        PersistedAuth {
            user: self.user.clone(),
            token: self.token.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    /// Restores a persisted session.
    ///
    /// A blob claiming authentication without a user or token is treated as
    /// anonymous; loading and error always start cleared.
    pub fn rehydrate(persisted: PersistedAuth) -> Self {
        match persisted {
            PersistedAuth {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
            } => Self {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
                is_loading: false,
                error: None,
            },
            PersistedAuth {
                is_authenticated: true,
                ..
            } => {
                tracing::warn!("persisted session is incomplete, starting signed out");
                Self::default()
            }
            _ => Self::default(),
        }
    }
}

/// The `auth-storage` blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}
