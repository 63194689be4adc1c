//! # Rollcall Auth
//!
//! Authentication state and authorization decisions for the Rollcall client.
//!
//! - [`session`]: the auth session state, its pure transitions and its
//!   persisted shape
//! - [`guard`]: the route guard deciding between loading, redirecting and
//!   rendering
//! - [`routes`]: the application route table and per-role navigation
//!
//! Nothing here performs I/O; the stores in the `rollcall` crate drive
//! these types and persist the results.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_auth::{AuthEvent, AuthState, guard_route};
//!
//! let state = AuthState::default().reduce(AuthEvent::Authenticated { user, token });
//! let decision = guard_route(&state, "/departments");
//! ```

pub mod guard;
pub mod routes;
pub mod session;

// Re-export commonly used types at crate root
pub use guard::{GuardDecision, LANDING_PATH, LOGIN_PATH, check_any_role, guard, guard_route};
pub use routes::{ROUTES, Route, navigation_for, resolve};
pub use session::{AUTH_STORAGE_KEY, AuthEvent, AuthState, PersistedAuth, REFRESH_TOKEN_KEY};
