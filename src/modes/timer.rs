use std::time::Duration;
use tokio::time::Instant;

use crate::game::Scheduler;

/// Single-slot tick deadline for the async game loop
///
/// The engine sets the deadline through [`Scheduler`]; the loop waits on
/// [`wait_for`] and calls the engine's tick once it passes.
#[derive(Debug, Default)]
pub struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Forget the deadline once it has fired
    pub fn clear(&mut self) -> Option<Instant> {
        self.deadline.take()
    }
}

impl Scheduler for TickTimer {
    fn schedule_tick(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }
}

/// Resolve at `deadline`, or never when there is none
pub async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
