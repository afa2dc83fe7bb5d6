use anyhow::{Context, Result};
use switchcost_adapters::process::terminate;

use super::{load_config, running_daemon_pid};

pub fn execute() -> Result<()> {
    let config = load_config();

    let Some(pid) = running_daemon_pid(&config) else {
        println!("⚫ No running daemon, nothing to stop");
        return Ok(());
    };

    terminate(pid).with_context(|| format!("failed to signal the daemon (pid {})", pid))?;
    println!("🛑 Daemon stopped (pid {})", pid);

    Ok(())
}
