use std::sync::Mutex;

use chrono::NaiveDateTime;
use switchcost_core::{EventLog, EventLogError, TransitionEvent};

#[derive(Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<TransitionEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<TransitionEvent>) -> Self {
        Self {
            events: Mutex::new(events),
        }
    }

    pub fn events(&self) -> Vec<TransitionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, event: &TransitionEvent) -> Result<(), EventLogError> {
        self.events
            .lock()
            .map_err(|_| std::io::Error::other("event log lock poisoned"))?
            .push(event.clone());
        Ok(())
    }

    fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.events
            .lock()
            .ok()?
            .last()
            .map(|event| event.timestamp)
    }

    fn read_all(&self) -> Result<Vec<TransitionEvent>, EventLogError> {
        Ok(self.events())
    }
}
