//! Deferred one-shot timers.

use crate::events::{ControllerEvent, Timer};
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;

/// Accepts a delay and a timer to deliver back to the controller once it elapses.
///
/// There is no cancellation; the controller treats stale timers as harmless.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, timer: Timer);
}

/// Delivers timers into the controller's event channel after a tokio sleep.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    sender: mpsc::Sender<ControllerEvent>,
}

impl TokioScheduler {
    pub fn new(sender: mpsc::Sender<ControllerEvent>) -> Self {
        Self { sender }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, timer: Timer) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(ControllerEvent::Timer(timer)).await.is_err() {
                // Controller loop already gone
                debug!("Dropping {} timer after shutdown", timer);
            }
        });
    }
}

#[cfg(test)]
pub use virtual_time::VirtualScheduler;
