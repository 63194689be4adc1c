//! # Rollcall Config
//!
//! Configuration types for the Rollcall client, loaded from environment
//! variables with defaults for local development:
//!
//! - [`api`]: backend base URL and transport timeout
//! - [`storage`]: directory for persisted client state
//! - [`query`]: query cache retry and default stale time
//! - [`logging`]: log level and log file directory
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env();
//! ```

pub mod api;
pub mod logging;
pub mod query;
pub mod storage;

// Re-export commonly used types at crate root
pub use api::ApiConfig;
pub use logging::LoggingConfig;
pub use query::QueryConfig;
pub use storage::StorageConfig;

use std::str::FromStr;

/// Every configuration section, loaded together at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api: ApiConfig::from_lookup(&lookup),
            storage: StorageConfig::from_lookup(&lookup),
            query: QueryConfig::from_lookup(&lookup),
            logging: LoggingConfig::from_lookup(&lookup),
        }
    }
}

/// Parses a variable, falling back to `default` when unset or malformed.
pub(crate) fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring malformed configuration value");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| {
        owned
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        let lookup = lookup_from(&[("QUERY_RETRY", "lots")]);
        assert_eq!(parse_or(&lookup, "QUERY_RETRY", 1u32), 1);
    }
}
