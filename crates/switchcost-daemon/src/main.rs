mod actors;
mod logging;
mod prober;
mod signals;

use std::sync::Arc;

use actors::FocusTrackerActor;
use anyhow::{Context, Result};
use clap::Parser;
use switchcost_adapters::{LivenessMarker, NdjsonEventLog};
use switchcost_core::Config;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "switchcost-daemon")]
#[command(about = "Records every change of the focused application", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(error) => (Config::default(), Some(error)),
    };

    let data_directory = config.storage.data_directory();
    let event_log = NdjsonEventLog::open(&data_directory).with_context(|| {
        format!(
            "failed to create data directory {}",
            data_directory.display()
        )
    })?;

    let _log_guard = logging::init(&data_directory, cli.verbose)?;

    if let Some(error) = config_error {
        warn!(%error, "failed to load config, using defaults");
    }

    info!(
        data_directory = %data_directory.display(),
        "switchcost daemon starting in foreground"
    );

    let _liveness_marker = LivenessMarker::acquire(&config.storage.liveness_marker_path())
        .context("cannot start switchcost daemon")?;

    let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
    signals::listen_for_shutdown(shutdown_sender)?;

    let tracker = FocusTrackerActor::new(
        prober::detect(),
        Arc::new(event_log),
        config.tracking.poll_interval(),
    );
    tracker.run(shutdown_receiver).await;

    info!("switchcost daemon stopped");
    Ok(())
}
