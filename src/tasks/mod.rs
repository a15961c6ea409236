//! Background tasks module
//!
//! The clock tick source and the stopwatch task that consumes it.

pub mod clock;
pub mod stopwatch;

// Re-export main types
pub use clock::{SleepTicks, TickSource, TICK_PERIOD};
pub use stopwatch::{Stopwatch, StopwatchCommand};
