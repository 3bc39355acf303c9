use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// JSON logs to `<app_data_dir>/logs/cleanbox.log`, rotated daily. Level
/// comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(app_data_dir: &Path) -> Result<(), String> {
    let log_dir = app_data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "cleanbox.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn creates_log_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A second global subscriber is refused, which is fine here.
        let _ = init_tracing(dir.path());
        assert!(dir.path().join("logs").is_dir());
    }
}
