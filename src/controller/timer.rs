//! Generation-guarded debounce timer
//!
//! Arms a one-shot delay by spawning a sleep task that posts a
//! `DebounceElapsed` event back to the controller's channel. Stopping or
//! restarting bumps the generation, so an already-spawned sleep delivers a
//! stale event the controller can recognize and drop.

use super::ControllerEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

pub(crate) struct DebounceTimer {
    events: UnboundedSender<ControllerEvent>,
    delay: Duration,
    generation: u64,
    running: bool,
}

impl DebounceTimer {
    pub(crate) fn new(events: UnboundedSender<ControllerEvent>, delay: Duration) -> Self {
        Self {
            events,
            delay,
            generation: 0,
            running: false,
        }
    }

    /// Arm (or re-arm) the timer for a full delay interval.
    pub(crate) fn start(&mut self) {
        self.generation += 1;
        self.running = true;
        let events = self.events.clone();
        let generation = self.generation;
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The controller may be gone; a dropped send is fine.
            let _ = events.send(ControllerEvent::DebounceElapsed(generation));
        });
    }

    pub(crate) fn stop(&mut self) {
        self.generation += 1;
        self.running = false;
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a fired event belongs to the currently-armed interval. A
    /// current event also disarms the timer.
    pub(crate) fn acknowledge(&mut self, generation: u64) -> bool {
        if self.running && generation == self.generation {
            self.running = false;
            true
        } else {
            false
        }
    }
}
