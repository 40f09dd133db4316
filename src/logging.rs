//! Logging initialization for flowscope.
//!
//! The TUI owns the terminal, so watch mode writes logs to
//! `<state>/logs/flowscope-{datetime}.log` instead of stderr. One-shot
//! CLI commands log to stderr directly.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in TUI mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// `debug_override` forces the level to "debug" (from the --debug flag);
/// `RUST_LOG` wins over both when set.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let level = if debug_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()));

    if is_tui_mode && config.logging.to_file {
        init_file_logging(config, filter)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

fn init_file_logging(
    config: &Config,
    filter: tracing_subscriber::EnvFilter,
) -> Result<LoggingHandle> {
    let logs_dir = config.logs_path();
    std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;

    let log_filename = log_filename_now();
    let log_file_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(LoggingHandle {
        _guard: Some(guard),
        log_file_path: Some(log_file_path),
    })
}

fn log_filename_now() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("flowscope-{}.log", timestamp)
}
