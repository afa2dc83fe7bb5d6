//! SwitchCost adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in
//! switchcost-core: the NDJSON event log on disk, the liveness marker used to
//! guard against duplicate daemons, and test doubles for the ports.

pub mod ndjson;
pub mod process;
pub mod testing;

pub use ndjson::NdjsonEventLog;
pub use process::{LivenessError, LivenessMarker};
pub use testing::{FailingEventLog, InMemoryEventLog, ScriptedFocusProber};
