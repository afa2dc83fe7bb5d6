mod failing_event_log;
mod in_memory_event_log;
mod scripted_prober;

pub use failing_event_log::FailingEventLog;
pub use in_memory_event_log::InMemoryEventLog;
pub use scripted_prober::ScriptedFocusProber;
