use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const MINIMUM_POLL_INTERVAL_MILLISECONDS: u64 = 10;

pub const EVENT_LOG_FILE_NAME: &str = "events.ndjson";
pub const LIVENESS_MARKER_FILE_NAME: &str = "switchcost.pid";
pub const DIAGNOSTICS_LOG_FILE_NAME: &str = "switchcost.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub poll_interval_milliseconds: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval_milliseconds: 200,
        }
    }
}

impl TrackingConfig {
    /// Interval between two focus probes, never shorter than 10ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_milliseconds
                .max(MINIMUM_POLL_INTERVAL_MILLISECONDS),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub data_directory: Option<PathBuf>,
}

impl StorageConfig {
    pub fn data_directory(&self) -> PathBuf {
        if let Some(ref directory) = self.data_directory {
            return directory.clone();
        }

        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("switchcost")
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.data_directory().join(EVENT_LOG_FILE_NAME)
    }

    pub fn liveness_marker_path(&self) -> PathBuf {
        self.data_directory().join(LIVENESS_MARKER_FILE_NAME)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switchcost")
            .join("config.toml")
    }
}
