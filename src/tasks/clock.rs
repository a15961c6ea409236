//! Clock tick source for the stopwatch task

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::sleep;

use crate::error::TickError;

/// Period between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A source of periodic ticks.
///
/// Each call hands out a future for the next tick only. Dropping that
/// future cancels the wait and releases whatever it holds.
pub trait TickSource: Send + 'static {
    fn next_tick(&mut self) -> BoxFuture<'static, Result<(), TickError>>;
}

/// Fixed-delay ticks backed by `tokio::time::sleep`.
///
/// The delay starts when the next tick is requested, so scheduler latency
/// between cycles accumulates as drift.
#[derive(Debug, Clone)]
pub struct SleepTicks {
    period: Duration,
}

impl SleepTicks {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for SleepTicks {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl TickSource for SleepTicks {
    fn next_tick(&mut self) -> BoxFuture<'static, Result<(), TickError>> {
        let period = self.period;
        Box::pin(async move {
            sleep(period).await;
            Ok(())
        })
    }
}
