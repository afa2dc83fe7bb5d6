//! SwitchCost core library
//!
//! Contains domain types, port definitions (traits) and the focus transition
//! detector. This crate has no knowledge of infrastructure concerns.

pub mod config;
pub mod detector;
pub mod domain;
pub mod ports;

pub use config::{Config, ConfigError, StorageConfig, TrackingConfig};
pub use detector::TransitionDetector;
pub use domain::{
    format_timestamp, parse_timestamp, ApplicationUsage, Elapsed, TransitionEvent, UsageReport,
};
pub use ports::{EventLog, EventLogError, FocusProber};
