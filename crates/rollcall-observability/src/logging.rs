use rollcall_config::LoggingConfig;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive. Drop it on shutdown to flush.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    #[cfg(feature = "observability")]
    _file: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LogGuard {
    /// Whether a log file is being written.
    pub fn has_file(&self) -> bool {
        #[cfg(feature = "observability")]
        {
            self._file.is_some()
        }
        #[cfg(not(feature = "observability"))]
        {
            false
        }
    }
}

/// Builds the console filter: `RUST_LOG` when set, else `level` with the
/// HTTP stack held at warn.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(format!("{},reqwest=warn,hyper=warn,hyper_util=warn", level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Installs the global subscriber.
///
/// Calling it twice keeps the first subscriber; the second call only
/// returns an inert guard.
pub fn init_tracing(config: &LoggingConfig) -> LogGuard {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .with_filter(build_filter(&config.level));

    #[cfg(feature = "observability")]
    {
        let (json_layer, guard) = match json_file_layer(config) {
            Some((layer, guard)) => (Some(layer), Some(guard)),
            None => (None, None),
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .with(json_layer)
            .try_init()
            .is_err()
        {
            return LogGuard { _file: None };
        }

        tracing::debug!(file = guard.is_some(), "tracing initialized");
        LogGuard { _file: guard }
    }

    #[cfg(not(feature = "observability"))]
    {
        let _ = tracing_subscriber::registry().with(console_layer).try_init();
        LogGuard {}
    }
}

#[cfg(feature = "observability")]
fn json_file_layer<S>(
    config: &LoggingConfig,
) -> Option<(
    Box<dyn Layer<S> + Send + Sync>,
    tracing_appender::non_blocking::WorkerGuard,
)>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let dir = config.dir.as_ref()?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "Failed to create log directory {}: {}. Logging to console only.",
            dir.display(),
            e
        );
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, "rollcall.json");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new(config.level.clone()))
        .boxed();

    Some((layer, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_level() {
        let filter = build_filter("debug");
        assert!(filter.to_string().contains("debug") || std::env::var("RUST_LOG").is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
            dir: Some(dir.path().join("logs")),
        };

        let first = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(!second.has_file());
        drop(first);
    }
}
