//! Logging configuration using the tracing ecosystem.
//!
//! Output goes to a daily-rotated file so the terminal UI stays intact.
//! `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=simdash=debug`
//! to see lookup issue/arrival order, or `simdash=trace` for every
//! dropdown state transition.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "simdash=info,warn";

/// Log file name prefix; the appender adds the date.
const LOG_FILE_PREFIX: &str = "simdash.log";

/// Initialize the logging system.
///
/// Logs land in `log_dir` when given, otherwise in the platform's local data
/// directory under `simdash/logs` (e.g. `~/.local/share/simdash/logs/` on Linux).
///
/// # Errors
///
/// Fails if the log directory cannot be determined or created, or if a
/// global subscriber is already set.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let log_dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => get_log_directory()?,
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "simdash starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(log_dir)
}

/// The default log directory: `<local data dir>/simdash/logs`.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("simdash").join("logs"))
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("simdash shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Ok(dir) = get_log_directory() {
            assert!(dir.ends_with("simdash/logs"));
        }
    }

    #[test]
    fn test_default_filter_targets_crate() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.starts_with("simdash="));
    }
}
