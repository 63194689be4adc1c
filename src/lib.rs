//! # Rollcall
//!
//! Client for a university attendance-management backend. Admins, faculty
//! and students share one client whose reach is decided by role.
//!
//! ## Overview
//!
//! - **Authentication**: login, registration and a persisted session with
//!   one-shot token refresh on 401
//! - **Role-based access**: a route guard over a fixed route table
//! - **Resources**: departments, courses, users and class sessions
//! - **Attendance**: QR scanning with geolocation, online marking, analytics
//! - **Dashboard**: a summary aggregated on the client
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Terminal front-end (clap)
//! ├── client/           # HTTP wrapper, request builder, endpoint table
//! ├── modules/          # Feature modules
//! │   ├── auth/         # Login, register, profile
//! │   ├── departments/
//! │   ├── courses/
//! │   ├── users/
//! │   ├── sessions/     # Class sessions, QR generation, join/leave
//! │   ├── attendance/   # Marking, records, student analytics
//! │   └── dashboard/    # Client-side summary
//! ├── scanner/          # QR attendance flow and geolocation
//! ├── stores/           # Persisted session and theme stores
//! └── state.rs          # AppContext wiring everything together
//! ```
//!
//! Each feature module follows the same structure:
//!
//! - `mod.rs`: Module exports
//! - `service.rs`: One typed function per endpoint
//! - `queries.rs`: Cached reads and invalidating mutations
//!
//! Shared building blocks live in the workspace crates:
//!
//! - `rollcall-core`: error taxonomy, response envelope, notifications, storage
//! - `rollcall-config`: environment-driven configuration
//! - `rollcall-models`: DTOs, typed ids and form validation
//! - `rollcall-auth`: session state reducer, route guard, route table
//! - `rollcall-cache`: query cache, keys and the invalidation table
//! - `rollcall-observability`: tracing setup and metrics helpers
//!
//! ## Roles
//!
//! | Role | Sees |
//! |------|------|
//! | Admin | Everything, including departments and user management |
//! | Faculty | Courses, sessions, attendance and analytics |
//! | Student | Sessions, own attendance and the QR scanner |
//!
//! ## Example
//!
//! ```ignore
//! use rollcall::state::AppContext;
//! use rollcall::modules::departments;
//!
//! let ctx = AppContext::from_config(config, notifier).await?;
//! ctx.login(LoginRequest::new("admin@uni.edu", "secret")).await?;
//! let list = departments::queries::list(&ctx, Default::default()).await?;
//! ```

pub mod cli;
pub mod client;
pub mod modules;
pub mod scanner;
pub mod state;
pub mod stores;

pub use rollcall_auth;
pub use rollcall_cache;
pub use rollcall_config;
pub use rollcall_core;
pub use rollcall_models;
pub use rollcall_observability;
