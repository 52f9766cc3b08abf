// logging.rs

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "calculator";
const LOG_SUFFIX: &str = "log";
/// Rotated files kept in the log directory; older ones are deleted.
pub const MAX_LOG_FILES: usize = 3;

/// Daily-rotating `calculator.<date>.log` files under `log_dir`.
pub fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
}

/// Installs the global subscriber. Logs go to files so the prompt stays
/// readable; keep the guard alive until exit or buffered lines are lost.
pub fn init(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(log_dir)?);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(guard)
}
