use std::collections::HashMap;

use super::{Elapsed, TransitionEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationUsage {
    pub application_name: String,
    pub total: Elapsed,
}

/// Time attributed to each destination application, most time first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsageReport {
    pub applications: Vec<ApplicationUsage>,
    pub switch_count: usize,
}

impl UsageReport {
    pub fn from_events(events: &[TransitionEvent]) -> Self {
        let mut totals: HashMap<&str, Elapsed> = HashMap::new();

        for event in events {
            *totals.entry(event.to.as_str()).or_insert_with(Elapsed::zero) +=
                event.elapsed_or_zero();
        }

        let mut applications: Vec<ApplicationUsage> = totals
            .into_iter()
            .map(|(application_name, total)| ApplicationUsage {
                application_name: application_name.to_string(),
                total,
            })
            .collect();

        applications.sort_by(|left, right| {
            right
                .total
                .cmp(&left.total)
                .then_with(|| left.application_name.cmp(&right.application_name))
        });

        Self {
            applications,
            switch_count: events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.switch_count == 0
    }

    pub fn total(&self) -> Elapsed {
        self.applications.iter().map(|usage| usage.total).sum()
    }
}
