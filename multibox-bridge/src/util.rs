use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "multibox-bridge.log";

/// Send tracing to `log_file`. The terminal belongs to the box while it is on
/// screen, so nothing is written to stderr.
///
/// Keep the guard alive until exit; dropping it flushes the file.
pub fn init_tracing(log_file: &Path) -> Result<WorkerGuard> {
    // RUST_LOG=multibox_core=debug,multibox_bridge=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let dir = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = log_file.file_name().unwrap_or(OsStr::new(LOG_FILE_NAME));

    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("opening log file {}", log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(writer)
        .compact()
        .try_init();

    Ok(guard)
}

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        // Leave raw mode first so the report is readable
        crate::app::restore_terminal();

        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());

        // The log file may never be flushed under panic = "abort"
        eprintln!("multibox-bridge panicked at {location}: {payload}");
        tracing::error!(%location, %payload, "panic");
    }));
}
