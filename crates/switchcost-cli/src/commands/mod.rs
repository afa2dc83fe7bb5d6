mod exit;
mod start;
mod status;

pub use exit::execute as exit;
pub use start::execute as start;
pub use status::execute as status;

use switchcost_adapters::process::{is_process_alive, read_pid};
use switchcost_core::Config;

fn load_config() -> Config {
    Config::load().unwrap_or_else(|error| {
        eprintln!("Warning: {}, using defaults", error);
        Config::default()
    })
}

/// PID of the running daemon, if its liveness marker names a live process.
fn running_daemon_pid(config: &Config) -> Option<u32> {
    read_pid(&config.storage.liveness_marker_path()).filter(|pid| is_process_alive(*pid))
}
