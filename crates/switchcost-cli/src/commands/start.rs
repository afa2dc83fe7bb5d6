use anyhow::Result;

use super::{load_config, running_daemon_pid};
use crate::daemon_launcher;

pub async fn execute() -> Result<()> {
    let config = load_config();

    if let Some(pid) = running_daemon_pid(&config) {
        println!("🟢 Daemon already running (pid {})", pid);
        return Ok(());
    }

    println!("🔄 Starting daemon...");
    let pid = daemon_launcher::launch_daemon(&config.storage.liveness_marker_path()).await?;
    println!("🟢 Daemon started (pid {})", pid);

    Ok(())
}
