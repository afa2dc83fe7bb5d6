use chrono::{NaiveDateTime, SubsecRound};

use crate::domain::TransitionEvent;
use crate::ports::{EventLog, EventLogError, FocusProber};

/// Holds the last recorded focus identifier and records a transition
/// whenever a new reading differs from it.
///
/// The identifier starts empty, so the first recorded transition of a run
/// always originates from `""`.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    current_identifier: String,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_identifier(&self) -> &str {
        &self.current_identifier
    }

    pub fn poll(
        &mut self,
        prober: &dyn FocusProber,
        log: &dyn EventLog,
        now: NaiveDateTime,
    ) -> Result<Option<TransitionEvent>, EventLogError> {
        let observed = prober.current_focus();
        self.observe(observed, log, now)
    }

    /// Records `observed` if it differs from the held identifier.
    ///
    /// The held identifier only changes once the append succeeded; on error
    /// the same transition is attempted again on the next observation.
    pub fn observe(
        &mut self,
        observed: String,
        log: &dyn EventLog,
        now: NaiveDateTime,
    ) -> Result<Option<TransitionEvent>, EventLogError> {
        if observed == self.current_identifier {
            return Ok(None);
        }

        // records carry microsecond precision
        let now = now.trunc_subsecs(6);
        let previous_timestamp = log.last_timestamp();
        let event =
            TransitionEvent::new(now, self.current_identifier.clone(), observed, previous_timestamp);

        log.append(&event)?;
        self.current_identifier.clone_from(&event.to);

        Ok(Some(event))
    }
}
