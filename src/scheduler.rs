//! Minute-aligned sampling scheduler.
//!
//! Three states, forward-only: Idle (before alignment), Armed (one-shot
//! timer to the next minute boundary), Running (fixed-period timer). Once
//! Running is reached the schedule is stable for the process lifetime.

use chrono::{Timelike, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::pipeline::SyncPipeline;

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Armed,
    Running,
}

/// Fires one pipeline cycle per tick, starting at the next minute boundary.
pub struct Scheduler {
    pipeline: SyncPipeline,
    period: Duration,
    state: State,
}

impl Scheduler {
    /// Create a scheduler in the Idle state.
    pub fn new(pipeline: SyncPipeline, period: Duration) -> Self {
        Self {
            pipeline,
            period,
            state: State::Idle,
        }
    }

    /// Delay from `second` (seconds into the current minute) to the next
    /// minute boundary.
    ///
    /// Second 0 waits a full minute; the first tick never fires immediately.
    pub fn alignment_delay(second: u32) -> Duration {
        Duration::from_secs(u64::from(60 - second.min(59)))
    }

    /// Start the scheduler, aligning the first tick to the next wall-clock
    /// minute boundary.
    pub fn run(self) -> JoinHandle<()> {
        let delay = Self::alignment_delay(Utc::now().second());
        info!(
            delay_secs = delay.as_secs(),
            "first sample aligned to next minute boundary"
        );
        self.run_with_initial_delay(delay)
    }

    /// Start the scheduler with an explicit initial delay.
    ///
    /// The repeating timer starts at the first fire and is never realigned to
    /// wall-clock boundaries afterwards; cumulative drift over a long session
    /// is accepted.
    pub fn run_with_initial_delay(mut self, delay: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.state = State::Armed;
            debug!(state = ?self.state, "scheduler armed");
            tokio::time::sleep(delay).await;

            self.state = State::Running;
            info!(
                state = ?self.state,
                period_secs = self.period.as_secs(),
                "scheduler running"
            );

            // Anchor the fixed-period timer before the first cycle so slow
            // ticks do not stretch the period.
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + self.period, self.period);
            loop {
                self.pipeline.run_tick().await;
                interval.tick().await;
            }
        })
    }
}
