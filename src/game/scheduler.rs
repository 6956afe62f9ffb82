//! Tick scheduling
//!
//! The engine never sleeps. After a tick (or on start/resume) it asks its
//! scheduler to call back after a delay; the driver that owns the scheduler
//! then calls [`GameEngine::tick`](super::GameEngine::tick) when that delay
//! has elapsed. A tick that fires after a pause, reset or game over is a
//! no-op, so nothing is ever cancelled.

use std::time::Duration;

/// Something that can arrange for the next tick
pub trait Scheduler {
    /// Request a tick after `delay`. Replaces any request still pending.
    fn schedule_tick(&mut self, delay: Duration);
}

/// Scheduler that only records the request; the caller fires it by hand.
///
/// Used by tests and anything else that wants to drive ticks synchronously.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: Option<Duration>,
    requests: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The delay of the request waiting to fire, if any
    pub fn pending(&self) -> Option<Duration> {
        self.pending
    }

    /// Consume the pending request
    pub fn take(&mut self) -> Option<Duration> {
        self.pending.take()
    }

    /// Total requests seen since creation
    pub fn requests(&self) -> usize {
        self.requests
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_tick(&mut self, delay: Duration) {
        self.pending = Some(delay);
        self.requests += 1;
    }
}
