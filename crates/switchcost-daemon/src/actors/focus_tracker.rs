use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use switchcost_core::{EventLog, FocusProber, TransitionDetector};

/// Polls the focus prober at a fixed interval and records transitions.
///
/// Shutdown is only observed between ticks, so a tick that started always
/// finishes its append before the loop exits.
pub struct FocusTrackerActor {
    prober: Box<dyn FocusProber>,
    log: Arc<dyn EventLog>,
    detector: TransitionDetector,
    poll_interval: Duration,
}

impl FocusTrackerActor {
    pub fn new(
        prober: Box<dyn FocusProber>,
        log: Arc<dyn EventLog>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            prober,
            log,
            detector: TransitionDetector::new(),
            poll_interval,
        }
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            poll_interval_milliseconds = self.poll_interval.as_millis() as u64,
            "focus tracker started"
        );

        let mut poll_interval = tokio::time::interval(self.poll_interval);
        poll_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = poll_interval.tick() => {
                    self.tick(Local::now().naive_local());
                }
                _ = shutdown.recv() => {
                    info!("shutdown requested, stopping focus tracker");
                    break;
                }
            }
        }

        debug!(
            last_identifier = self.detector.current_identifier(),
            "focus tracker stopped"
        );
    }

    fn tick(&mut self, now: NaiveDateTime) {
        match self
            .detector
            .poll(self.prober.as_ref(), self.log.as_ref(), now)
        {
            Ok(Some(event)) => {
                info!(
                    from = %event.from,
                    to = %event.to,
                    duration = %event.duration.map(|elapsed| elapsed.to_string()).unwrap_or_else(|| "0".to_string()),
                    "focus transition recorded"
                );
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "failed to record focus transition, retrying next tick");
            }
        }
    }
}
