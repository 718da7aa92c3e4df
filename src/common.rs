use crate::errors::{Result, TapedeckError};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::sync::Mutex;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

// Version loaded from .version file at compile time
pub const VERSION: &str = include_str!(".version");

static LOGGING_INITIALIZED: Lazy<Mutex<HashSet<Option<String>>>> =
    Lazy::new(|| Mutex::new(HashSet::new()));

pub fn initialize_logging(logger_name: Option<&str>, output: &str) -> Result<()> {
    let mut initialized = LOGGING_INITIALIZED.lock().unwrap();
    let key = logger_name.map(|s| s.to_string());
    if initialized.contains(&key) {
        return Ok(());
    }
    initialized.insert(key);
    drop(initialized);

    let log_despite_testing = std::env::var("LOG_TEST").is_ok();
    let is_testing = std::env::var("CARGO_TEST").is_ok();
    if is_testing && !log_despite_testing {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if output == "stderr" {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(!log_despite_testing)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| TapedeckError::Generic(format!("Failed to install subscriber: {e}")))?;
    } else if output == "file" {
        let proj_dirs = directories::ProjectDirs::from("", "", "tapedeck")
            .ok_or_else(|| TapedeckError::Generic("Failed to get project directories".to_string()))?;
        let log_dir = if cfg!(target_os = "macos") {
            proj_dirs.cache_dir()
        } else {
            proj_dirs.state_dir().unwrap_or(proj_dirs.cache_dir())
        };

        fs::create_dir_all(log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .max_log_files(10)
            .filename_prefix("tapedeck")
            .filename_suffix("log")
            .build(log_dir)
            .map_err(|e| TapedeckError::Generic(format!("Failed to open log file: {e}")))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // The guard must outlive the process or the background writer stops.
        std::mem::forget(guard);

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(non_blocking)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| TapedeckError::Generic(format!("Failed to install subscriber: {e}")))?;
    }

    Ok(())
}
