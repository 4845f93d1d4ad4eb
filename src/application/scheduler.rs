//! Fixed-cadence sampling loop.
//!
//! Each cycle is padded with an idle wait so that cycle start times stay on
//! the configured interval regardless of how long sampling took. A cycle that
//! overruns is followed immediately by the next one; missed cycles are not
//! caught up.

use crate::application::capture::SampleCapture;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Run `work`, then sleep for whatever is left of `expected`.
///
/// Returns the output of `work`.
pub async fn ensure_duration<F>(expected: Duration, work: F) -> F::Output
where
    F: Future,
{
    let start = Instant::now();
    let output = work.await;
    let elapsed = start.elapsed();

    match expected.checked_sub(elapsed) {
        Some(remaining) if !remaining.is_zero() => tokio::time::sleep(remaining).await,
        _ => {
            if elapsed > expected {
                warn!(
                    "Scheduler: Cycle took {:?}, longer than the {:?} interval",
                    elapsed, expected
                );
            }
        }
    }

    output
}

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One sampling cycle padded to the interval.
    pub async fn run_cycle(&self, capture: &mut SampleCapture) {
        ensure_duration(self.interval, capture.capture_once()).await;
    }

    /// Sample forever. Stopping is left to the caller (e.g. racing against a
    /// shutdown signal).
    pub async fn run(&self, capture: &mut SampleCapture) {
        loop {
            self.run_cycle(capture).await;
        }
    }
}
