//! HTTP access to the attendance backend.
//!
//! - [`ApiClient`]: the configured client with bearer auth and 401 recovery
//! - [`ApiRequest`]: an owned, replayable request description
//! - [`endpoints`]: backend paths

mod api;
pub mod endpoints;
mod request;

pub use api::ApiClient;
pub use request::ApiRequest;
