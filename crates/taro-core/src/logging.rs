//! Logging setup for applications and demos embedding taro widgets.
//!
//! The library itself only emits `tracing` events (`debug!` on state
//! transitions, `warn!` when a message is rejected, e.g. activating a disabled
//! menu item). Installing a subscriber is the application's call; these
//! helpers cover the common cases.

use crate::error::Error;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset (default: `INFO`).
    pub level: Level,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
    /// Colorize output (ignored for file output; default: true).
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file: None,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Debug-level logging appended to `path`.
    pub fn debug_file(path: impl Into<PathBuf>) -> Self {
        Self {
            level: Level::DEBUG,
            file: Some(path.into()),
            ansi: false,
        }
    }
}

/// Install a global `tracing` subscriber. `RUST_LOG` overrides `config.level`.
///
/// Fails if a global subscriber is already installed or the log file cannot
/// be opened.
pub fn init_logging(config: &LogConfig) -> Result<(), Error> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .compact();

    match &config.file {
        Some(path) => {
            let file = log_to_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init()
        }
        None => builder
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .try_init(),
    }
    .map_err(|e| Error::Logging(e.to_string()))
}

/// Open a log file in append mode, creating it if needed.
///
/// ```no_run
/// use taro_core::logging::log_to_file;
/// use std::io::Write;
///
/// let mut f = log_to_file("widgets.log").unwrap();
/// writeln!(f, "debug message").unwrap();
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_logs_info_to_stderr() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.file.is_none());
    }

    #[test]
    fn debug_file_config() {
        let config = LogConfig::debug_file("/tmp/x.log");
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.ansi);
    }

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("taro-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        writeln!(log_to_file(&path).unwrap(), "one").unwrap();
        writeln!(log_to_file(&path).unwrap(), "two").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "one\ntwo\n");
        let _ = std::fs::remove_file(&path);
    }
}
