//! Log setup. The terminal is owned by the TUI, so logs only ever go to a file.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a file subscriber when `log_file` is given.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. The returned guard
/// flushes the writer on drop and must live as long as logging is wanted.
pub fn init(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .with_ansi(false)
        .compact()
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(Some(guard))
}
