//! Timer state structure and formatting

use serde::{Deserialize, Serialize};

/// Run status of the stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

impl RunState {
    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }
}

/// Authoritative timer state as seen by the owning task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub elapsed_seconds: u64,
    pub run_state: RunState,
}

impl TimerSnapshot {
    /// Create a stopped snapshot at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// Formatted `HH:MM:SS` form of the elapsed counter
    pub fn formatted_time(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

/// Read-only view published to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub formatted_time: String,
    pub is_running: bool,
}

/// Format a second count as zero-padded `HH:MM:SS`.
///
/// The hour field has no upper bound and simply grows past two digits.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Text shown on the ongoing-status surface while the timer runs
pub fn ongoing_status_text(formatted_time: &str) -> String {
    format!("Elapsed time: {}", formatted_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_and_small_values() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(59), "00:00:59");
        assert_eq!(format_elapsed(60), "00:01:00");
    }

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_elapsed(3725), "01:02:05");
        assert_eq!(format_elapsed(86_399), "23:59:59");
    }

    #[test]
    fn hour_field_grows_past_two_digits() {
        assert_eq!(format_elapsed(100 * 3600), "100:00:00");
        assert_eq!(format_elapsed(1234 * 3600 + 61), "1234:01:01");
    }

    #[test]
    fn default_snapshot_is_stopped_at_zero() {
        let snapshot = TimerSnapshot::new();
        assert_eq!(snapshot.run_state, RunState::Stopped);
        assert!(!snapshot.is_running());
        assert_eq!(snapshot.formatted_time(), "00:00:00");
    }

    #[test]
    fn ongoing_status_text_mentions_elapsed_time() {
        assert_eq!(ongoing_status_text("00:01:23"), "Elapsed time: 00:01:23");
    }
}
