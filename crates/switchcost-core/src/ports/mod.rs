mod event_log;
mod focus_prober;

pub use event_log::{EventLog, EventLogError};
pub use focus_prober::FocusProber;
