//! # Rollcall Cache
//!
//! Client-side request cache for the Rollcall client.
//!
//! This crate provides:
//! - Hierarchical query keys with prefix matching ([`QueryKey`])
//! - Per-resource key builders and filter fingerprints ([`keys`])
//! - The mutation -> invalidated keys table ([`Mutation`])
//! - An in-memory [`QueryClient`] with stale times, coalesced fetches,
//!   bounded retry, observers and polling
//!
//! Cached values are never authoritative. A mutation never writes into the
//! cache; it invalidates, and observed queries refetch.
//!
//! # Example
//!
//! ```ignore
//! use rollcall_cache::{QueryClient, QueryOptions, keys, stale_times};
//!
//! let client = QueryClient::new(QueryConfig::default());
//! let departments: Vec<Department> = client
//!     .fetch(
//!         &keys::departments::lists(),
//!         QueryOptions::stale(stale_times::DEPARTMENT_LIST),
//!         fetcher(move || {
//!             let api = api.clone();
//!             async move { DepartmentService::list_departments(&api, &Default::default()).await }
//!         }),
//!     )
//!     .await?;
//! ```

pub mod client;
pub mod invalidation;
pub mod key;
pub mod keys;
pub mod options;

pub use client::{Fetcher, QueryClient, QueryObserver, QueryState, fetcher};
pub use invalidation::Mutation;
pub use key::QueryKey;
pub use keys::hash_filters;
pub use options::{QueryOptions, stale_times};
