//! Logging setup.
//!
//! The TUI owns the terminal, so while it runs log lines go to a file under
//! the state directory. CLI subcommands log to stderr instead.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the non-blocking writer alive; dropping it flushes buffered output.
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,
    /// Where log lines went, when file logging is active.
    pub log_file_path: Option<PathBuf>,
}

/// Install the global subscriber.
///
/// Level resolution: `RUST_LOG` wins if set, then `--debug`, then the
/// configured level. The handle must outlive the program body or buffered
/// lines are lost.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let fallback = if debug_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    if !is_tui_mode || !config.logging.to_file {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        });
    }

    let logs_dir = config.logs_path();
    std::fs::create_dir_all(&logs_dir)?;
    let file_name = format!(
        "assetdesk-{}.log",
        chrono::Utc::now().format("%Y%m%dT%H%M%SZ")
    );

    let appender = tracing_appender::rolling::never(&logs_dir, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Ok(LoggingHandle {
        _guard: Some(guard),
        log_file_path: Some(logs_dir.join(file_name)),
    })
}
