use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LivenessError {
    #[error("daemon already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("liveness marker I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("signalling processes is not supported on this platform")]
    Unsupported,
}

/// PID file held for the lifetime of the daemon.
///
/// Dropping the marker removes the file.
#[derive(Debug)]
pub struct LivenessMarker {
    path: PathBuf,
}

impl LivenessMarker {
    /// Writes the current process id to `path`.
    ///
    /// Fails with [`LivenessError::AlreadyRunning`] when the file names another
    /// live process. A marker left behind by a dead process is replaced.
    pub fn acquire(path: &Path) -> Result<Self, LivenessError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        match Self::create(path) {
            Ok(marker) => return Ok(marker),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {}
            Err(error) => return Err(error.into()),
        }

        match read_pid(path) {
            Some(pid) if pid != std::process::id() && is_process_alive(pid) => {
                return Err(LivenessError::AlreadyRunning { pid });
            }
            Some(pid) => info!(pid, path = %path.display(), "replacing stale liveness marker"),
            None => info!(path = %path.display(), "replacing unreadable liveness marker"),
        }

        fs::remove_file(path)?;
        Ok(Self::create(path)?)
    }

    fn create(path: &Path) -> io::Result<Self> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        writeln!(file, "{}", std::process::id())?;

        debug!(path = %path.display(), "liveness marker written");

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LivenessMarker {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_file(&self.path) {
            debug!(%error, "liveness marker already removed");
        } else {
            debug!("liveness marker cleaned up");
        }
    }
}

pub fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(unix)]
pub fn is_process_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };

    if pid <= 0 {
        return false;
    }

    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }

    io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
pub fn is_process_alive(_pid: u32) -> bool {
    false
}

/// Asks the process to shut down with SIGTERM.
#[cfg(unix)]
pub fn terminate(pid: u32) -> Result<(), LivenessError> {
    let pid = libc::pid_t::try_from(pid)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    if unsafe { libc::kill(pid, libc::SIGTERM) } != 0 {
        return Err(io::Error::last_os_error().into());
    }

    Ok(())
}

#[cfg(not(unix))]
pub fn terminate(_pid: u32) -> Result<(), LivenessError> {
    Err(LivenessError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DEAD_PID: u32 = 2_147_483_000;

    #[test]
    fn acquire_writes_current_pid() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("switchcost.pid");

        let marker = LivenessMarker::acquire(&path).unwrap();

        assert_eq!(marker.path(), path);
        assert_eq!(read_pid(&path), Some(std::process::id()));
    }

    #[test]
    fn acquire_creates_parent_directory() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("state").join("switchcost.pid");

        let _marker = LivenessMarker::acquire(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn drop_removes_marker() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("switchcost.pid");

        let marker = LivenessMarker::acquire(&path).unwrap();
        drop(marker);

        assert!(!path.exists());
    }

    #[test]
    fn stale_marker_of_dead_process_is_replaced() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("switchcost.pid");
        fs::write(&path, format!("{}\n", DEAD_PID)).unwrap();

        let _marker = LivenessMarker::acquire(&path).unwrap();

        assert_eq!(read_pid(&path), Some(std::process::id()));
    }

    #[test]
    fn unreadable_marker_is_replaced() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("switchcost.pid");
        fs::write(&path, "not a pid").unwrap();

        let _marker = LivenessMarker::acquire(&path).unwrap();

        assert_eq!(read_pid(&path), Some(std::process::id()));
    }

    #[cfg(unix)]
    #[test]
    fn marker_of_live_process_blocks_startup() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("switchcost.pid");
        fs::write(&path, "1\n").unwrap();

        let result = LivenessMarker::acquire(&path);

        assert!(matches!(result, Err(LivenessError::AlreadyRunning { pid: 1 })));
        assert_eq!(read_pid(&path), Some(1));
    }

    #[test]
    fn read_pid_of_missing_file_is_none() {
        let directory = tempdir().unwrap();

        assert_eq!(read_pid(&directory.path().join("missing.pid")), None);
    }

    #[cfg(unix)]
    #[test]
    fn current_process_is_alive() {
        assert!(is_process_alive(std::process::id()));
    }

    #[test]
    fn dead_and_invalid_pids_are_not_alive() {
        assert!(!is_process_alive(DEAD_PID));
        assert!(!is_process_alive(0));
        assert!(!is_process_alive(u32::MAX));
    }

    #[cfg(unix)]
    #[test]
    fn terminate_unknown_process_fails() {
        let result = terminate(DEAD_PID);

        assert!(matches!(result, Err(LivenessError::Io { .. })));
    }
}
