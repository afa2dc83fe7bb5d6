use std::path::Path;

use anyhow::Result;
use switchcost_core::config::DIAGNOSTICS_LOG_FILE_NAME;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs to stderr and to `switchcost.log` in the data directory.
///
/// The returned guard flushes the file writer when dropped and must outlive
/// the daemon loop.
pub fn init(data_directory: &Path, verbose: bool) -> Result<WorkerGuard> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("switchcost_daemon={}", level).parse()?)
        .add_directive(format!("switchcost_adapters={}", level).parse()?);

    let file_appender = tracing_appender::rolling::never(data_directory, DIAGNOSTICS_LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}
