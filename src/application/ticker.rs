//! Cancellable periodic task

use std::ops::ControlFlow;
use std::time::Duration as StdDuration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Runs a callback on a fixed cadence until the callback breaks or the
/// ticker is dropped.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker. The first call happens one `period` after spawning.
    pub fn spawn<F>(period: StdDuration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let period = period.max(StdDuration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Whether the callback broke out of the loop or the task was aborted
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
