mod elapsed;
mod transition_event;
mod usage_report;

pub use elapsed::Elapsed;
pub use transition_event::{format_timestamp, parse_timestamp, TransitionEvent};
pub use usage_report::{ApplicationUsage, UsageReport};
