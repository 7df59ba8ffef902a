use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber for a host process embedding the engine.
///
/// The engine itself only emits `tracing` events; hosts call this once at startup.
pub fn init_logging(component: &str, to_stderr: bool, config: &LoggingConfig) -> WorkerGuard {
    if let Err(err) = std::fs::create_dir_all(&config.directory) {
        // No subscriber exists yet to carry this.
        eprintln!(
            "javalens: cannot create log directory {}: {err}",
            config.directory.display()
        );
    }

    // Roll daily, with the component name as the prefix
    let file_appender = tracing_appender::rolling::daily(&config.directory, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.as_str()));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()
    } else {
        registry.try_init()
    };
    if let Err(err) = installed {
        // Reaches whichever subscriber is already installed.
        tracing::warn!(component, error = %err, "global subscriber already set, keeping it");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_directory() {
        let root = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: root.path().join("logs"),
            default_filter: "debug".to_string(),
        };
        let guard = init_logging("javalens-test", false, &config);
        tracing::info!("logging initialized");
        drop(guard);
        assert!(config.directory.is_dir());
    }

    #[test]
    fn test_second_init_keeps_running() {
        let root = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: root.path().join("logs"),
            default_filter: "info".to_string(),
        };
        let first = init_logging("javalens-first", false, &config);
        let second = init_logging("javalens-second", true, &config);
        drop((first, second));
        assert!(config.directory.is_dir());
    }
}
