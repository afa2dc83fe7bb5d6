use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use switchcost_adapters::process::{is_process_alive, read_pid};
use tokio::time::sleep;

const DAEMON_STARTUP_TIMEOUT: Duration = Duration::from_secs(5);
const DAEMON_POLL_INTERVAL: Duration = Duration::from_millis(100);
const DAEMON_PATH_VARIABLE: &str = "SWITCHCOST_DAEMON_PATH";

/// Spawns the daemon detached and waits until its liveness marker appears.
pub async fn launch_daemon(liveness_marker_path: &Path) -> Result<u32> {
    spawn_daemon()?;
    wait_for_liveness_marker(liveness_marker_path).await
}

fn spawn_daemon() -> Result<()> {
    let daemon_path = find_daemon_binary()?;

    Command::new(&daemon_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {}", daemon_path.display()))?;

    Ok(())
}

fn find_daemon_binary() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DAEMON_PATH_VARIABLE) {
        return Ok(PathBuf::from(path));
    }

    let current_exe = std::env::current_exe().context("cannot locate the current executable")?;
    let exe_dir = current_exe
        .parent()
        .context("cannot locate the executable directory")?;

    let daemon_name = if cfg!(windows) {
        "switchcost-daemon.exe"
    } else {
        "switchcost-daemon"
    };

    let sibling_path = exe_dir.join(daemon_name);
    if sibling_path.exists() {
        return Ok(sibling_path);
    }

    if let Ok(path) = which::which(daemon_name) {
        return Ok(path);
    }

    bail!(
        "switchcost-daemon not found. Make sure it is installed or set {}",
        DAEMON_PATH_VARIABLE
    );
}

async fn wait_for_liveness_marker(path: &Path) -> Result<u32> {
    let start = Instant::now();

    while start.elapsed() < DAEMON_STARTUP_TIMEOUT {
        if let Some(pid) = read_pid(path).filter(|pid| is_process_alive(*pid)) {
            return Ok(pid);
        }
        sleep(DAEMON_POLL_INTERVAL).await;
    }

    bail!(
        "timeout: the daemon did not start within {} seconds",
        DAEMON_STARTUP_TIMEOUT.as_secs()
    );
}
