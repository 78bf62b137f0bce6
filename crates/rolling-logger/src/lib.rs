//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to stdout and to a fixed ring
//! of log files in a directory. The active file is `{app_name}.log`; once it
//! grows past the size limit it becomes `{app_name}.1.log`, the previous
//! `.1` becomes `.2`, and so on until the oldest file drops off the end.

mod writer;

use std::fmt;
use std::path::PathBuf;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use writer::RollingFileWriter;

/// Default size of a single log file before it is rotated (5 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of log files kept, including the active one
pub const DEFAULT_MAX_FILES: usize = 5;

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub app_name: String,
    pub max_bytes: u64,
    pub max_files: usize,
    /// Filter directive used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl LoggerConfig {
    pub fn new(log_dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            log_dir: log_dir.into(),
            app_name: app_name.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
            default_filter: "info".to_string(),
        }
    }
}

/// Local wall-clock timestamps with millisecond precision
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize logging with default rotation settings
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<(), String> {
    init_logger_with(LoggerConfig::new(log_dir, app_name))
}

/// Initialize logging. Fails if the log directory cannot be created or a
/// global subscriber is already installed.
pub fn init_logger_with(config: LoggerConfig) -> Result<(), String> {
    std::fs::create_dir_all(&config.log_dir)
        .map_err(|e| format!("Failed to create log dir {}: {}", config.log_dir.display(), e))?;

    let file_writer = RollingFileWriter::new(
        config.log_dir.clone(),
        &config.app_name,
        config.max_bytes,
        config.max_files,
    );

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTimer))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        app = %config.app_name,
        "Rolling logger initialized"
    );
    Ok(())
}

fn ensure_installed() -> Result<(), String> {
    if tracing::dispatcher::has_been_set() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

/// Log a one-off message at info level
pub fn info(msg: &str) -> Result<(), String> {
    ensure_installed()?;
    tracing::info!("{}", msg);
    Ok(())
}

/// Log a one-off message at error level
pub fn error(msg: &str) -> Result<(), String> {
    ensure_installed()?;
    tracing::error!("{}", msg);
    Ok(())
}
