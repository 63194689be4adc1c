use std::path::PathBuf;

/// Logging settings.
///
/// - `LOG_LEVEL`: filter directive when `RUST_LOG` is unset, default `info`
/// - `LOG_DIR`: directory for the rolling JSON log file; unset disables it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: lookup("LOG_LEVEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            dir: lookup("LOG_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_file_logging_disabled_by_default() {
        let config = LoggingConfig::from_lookup(&|_: &str| None);
        assert_eq!(config.level, "info");
        assert!(config.dir.is_none());
    }

    #[test]
    fn test_log_dir_enables_file_logging() {
        let lookup = lookup_from(&[("LOG_LEVEL", "debug"), ("LOG_DIR", "logs")]);
        let config = LoggingConfig::from_lookup(&lookup);
        assert_eq!(config.level, "debug");
        assert_eq!(config.dir, Some(PathBuf::from("logs")));
    }
}
