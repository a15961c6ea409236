//! Test doubles shared by unit tests

use std::sync::Mutex;

use futures::future::BoxFuture;

use crate::error::TickError;
use crate::services::HostEnvironment;
use crate::tasks::TickSource;

/// Host environment that records every call
#[derive(Debug, Default)]
pub struct RecordingEnvironment {
    kept_alive: Mutex<Vec<bool>>,
    statuses: Mutex<Vec<Option<String>>>,
}

impl RecordingEnvironment {
    pub fn kept_alive_changes(&self) -> Vec<bool> {
        self.kept_alive.lock().unwrap().clone()
    }

    pub fn is_kept_alive(&self) -> bool {
        self.kept_alive.lock().unwrap().last().copied().unwrap_or(false)
    }

    pub fn statuses(&self) -> Vec<Option<String>> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.statuses.lock().unwrap().last().cloned().flatten()
    }
}

impl HostEnvironment for RecordingEnvironment {
    fn set_kept_alive(&self, kept_alive: bool) {
        self.kept_alive.lock().unwrap().push(kept_alive);
    }

    fn publish_ongoing_status(&self, text: Option<&str>) {
        self.statuses.lock().unwrap().push(text.map(str::to_string));
    }
}

/// Tick source whose every tick fails immediately
pub struct FailingTicks;

impl TickSource for FailingTicks {
    fn next_tick(&mut self) -> BoxFuture<'static, Result<(), TickError>> {
        Box::pin(async { Err(TickError("clock unavailable".to_string())) })
    }
}
