use std::time::Duration;

use crate::parse_or;

/// Query cache defaults.
///
/// - `QUERY_RETRY`: silent retries after a failed fetch, default 1
/// - `QUERY_STALE_SECS`: stale time for queries without their own, default 300
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    pub retry: u32,
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            retry: 1,
            stale_time: Duration::from_secs(5 * 60),
        }
    }
}

impl QueryConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            retry: parse_or(lookup, "QUERY_RETRY", 1),
            stale_time: Duration::from_secs(parse_or(lookup, "QUERY_STALE_SECS", 300)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert_eq!(config.retry, 1);
        assert_eq!(config.stale_time, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let lookup = lookup_from(&[("QUERY_RETRY", "0"), ("QUERY_STALE_SECS", "60")]);
        let config = QueryConfig::from_lookup(&lookup);
        assert_eq!(config.retry, 0);
        assert_eq!(config.stale_time, Duration::from_secs(60));
    }
}
