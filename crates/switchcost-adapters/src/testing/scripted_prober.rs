use std::collections::VecDeque;
use std::sync::Mutex;

use switchcost_core::FocusProber;

/// Replays a fixed sequence of readings, then keeps returning the last one.
pub struct ScriptedFocusProber {
    readings: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedFocusProber {
    pub fn new<I, S>(readings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            readings: Mutex::new(readings.into_iter().map(Into::into).collect()),
            last: Mutex::new(String::new()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.readings.lock().map(|readings| readings.len()).unwrap_or(0)
    }
}

impl FocusProber for ScriptedFocusProber {
    fn current_focus(&self) -> String {
        let next = self
            .readings
            .lock()
            .ok()
            .and_then(|mut readings| readings.pop_front());

        let Ok(mut last) = self.last.lock() else {
            return String::new();
        };

        if let Some(reading) = next {
            *last = reading;
        }

        last.clone()
    }
}
