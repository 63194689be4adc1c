//! Feature modules, one per backend resource.
//!
//! Each module has the same shape:
//!
//! - `service.rs`: one async function per backend operation. No caching,
//!   no notifications beyond what the HTTP client emits.
//! - `queries.rs`: cached reads and invalidating mutations over the
//!   service, keyed by `rollcall_cache::keys`.

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod sessions;
pub mod users;
