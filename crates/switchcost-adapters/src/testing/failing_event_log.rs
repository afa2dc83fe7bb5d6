use std::sync::Mutex;

use chrono::NaiveDateTime;
use switchcost_core::{EventLog, EventLogError, TransitionEvent};

use super::InMemoryEventLog;

/// Event log whose appends fail a configurable number of times before
/// succeeding. Successful appends are kept in memory.
pub struct FailingEventLog {
    remaining_failures: Mutex<Option<usize>>,
    inner: InMemoryEventLog,
}

impl FailingEventLog {
    pub fn always() -> Self {
        Self {
            remaining_failures: Mutex::new(None),
            inner: InMemoryEventLog::new(),
        }
    }

    pub fn failing_first(count: usize) -> Self {
        Self {
            remaining_failures: Mutex::new(Some(count)),
            inner: InMemoryEventLog::new(),
        }
    }

    pub fn events(&self) -> Vec<TransitionEvent> {
        self.inner.events()
    }

    fn should_fail(&self) -> bool {
        let Ok(mut remaining) = self.remaining_failures.lock() else {
            return true;
        };

        match remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(count) => {
                *count -= 1;
                true
            }
        }
    }
}

impl EventLog for FailingEventLog {
    fn append(&self, event: &TransitionEvent) -> Result<(), EventLogError> {
        if self.should_fail() {
            return Err(std::io::Error::other("no space left on device").into());
        }

        self.inner.append(event)
    }

    fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.inner.last_timestamp()
    }

    fn read_all(&self) -> Result<Vec<TransitionEvent>, EventLogError> {
        self.inner.read_all()
    }
}
