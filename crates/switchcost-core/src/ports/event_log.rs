use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::TransitionEvent;

#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("event log I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to serialize transition event: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Append-only store of transition events.
pub trait EventLog: Send + Sync {
    /// Appends one record. A record is either fully visible to readers or not at all.
    fn append(&self, event: &TransitionEvent) -> Result<(), EventLogError>;

    /// Timestamp of the most recent record; `None` when the log is missing,
    /// empty, or its last record cannot be parsed.
    fn last_timestamp(&self) -> Option<NaiveDateTime>;

    fn read_all(&self) -> Result<Vec<TransitionEvent>, EventLogError>;
}
