//! State publisher: one publish point, several independent sinks
//!
//! Every published snapshot goes to
//! - two `watch` values (formatted time and running flag) for bound observers,
//! - a best-effort `broadcast` of [`TimeUpdate`] for unbound observers,
//! - the host environment's ongoing-status and kept-alive surface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::debug;

use super::timer_state::{format_elapsed, ongoing_status_text, TimerSnapshot, TimerView};
use crate::services::HostEnvironment;

/// Name of the broadcast event
pub const TIME_UPDATE_EVENT: &str = "time-update";

/// Broadcast buffer; slow receivers skip ahead past this
const BROADCAST_CAPACITY: usize = 64;

/// Payload of the broadcast path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeUpdate {
    pub formatted_time: String,
}

/// Writer side, owned by the stopwatch task
pub struct Publisher {
    time_tx: watch::Sender<String>,
    running_tx: watch::Sender<bool>,
    broadcast_tx: broadcast::Sender<TimeUpdate>,
    environment: Arc<dyn HostEnvironment>,
    kept_alive: bool,
}

/// Reader side, cloned into the host and handed to observers
#[derive(Clone)]
pub struct Observers {
    pub time_rx: watch::Receiver<String>,
    pub running_rx: watch::Receiver<bool>,
    broadcast_tx: broadcast::Sender<TimeUpdate>,
}

/// Create a connected publisher/observers pair starting at `00:00:00`, stopped
pub fn channel(environment: Arc<dyn HostEnvironment>) -> (Publisher, Observers) {
    let (time_tx, time_rx) = watch::channel(format_elapsed(0));
    let (running_tx, running_rx) = watch::channel(false);
    let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

    let publisher = Publisher {
        time_tx,
        running_tx,
        broadcast_tx: broadcast_tx.clone(),
        environment,
        kept_alive: false,
    };
    let observers = Observers {
        time_rx,
        running_rx,
        broadcast_tx,
    };
    (publisher, observers)
}

impl Publisher {
    /// Push a snapshot to every sink
    pub fn publish(&mut self, snapshot: &TimerSnapshot) {
        let formatted = snapshot.formatted_time();
        let running = snapshot.is_running();

        self.time_tx.send_if_modified(|current| {
            if *current == formatted {
                return false;
            }
            current.clone_from(&formatted);
            true
        });
        self.running_tx.send_if_modified(|current| {
            if *current == running {
                return false;
            }
            *current = running;
            true
        });

        let update = TimeUpdate {
            formatted_time: formatted.clone(),
        };
        if self.broadcast_tx.send(update).is_err() {
            debug!("No broadcast receivers registered, update dropped");
        }

        if running && !self.kept_alive {
            self.environment.set_kept_alive(true);
            self.kept_alive = true;
        }
        if running {
            self.environment
                .publish_ongoing_status(Some(&ongoing_status_text(&formatted)));
        } else {
            self.environment.publish_ongoing_status(None);
        }
        if !running && self.kept_alive {
            self.environment.set_kept_alive(false);
            self.kept_alive = false;
        }
    }

    /// Whether the environment is currently told to keep the process alive
    #[cfg(test)]
    pub fn is_kept_alive(&self) -> bool {
        self.kept_alive
    }
}

impl Observers {
    /// Synchronous read of the latest published values
    pub fn view(&self) -> TimerView {
        TimerView {
            formatted_time: self.time_rx.borrow().clone(),
            is_running: *self.running_rx.borrow(),
        }
    }

    /// Register a new receiver on the broadcast path
    pub fn subscribe(&self) -> TimeUpdateReceiver {
        TimeUpdateReceiver {
            rx: Some(self.broadcast_tx.subscribe()),
        }
    }
}

/// A registered broadcast receiver.
///
/// Only updates sent after registration are delivered. A receiver that
/// falls behind skips ahead instead of failing.
#[derive(Debug)]
pub struct TimeUpdateReceiver {
    rx: Option<broadcast::Receiver<TimeUpdate>>,
}

impl TimeUpdateReceiver {
    /// Wait for the next update.
    ///
    /// Returns `None` once unregistered or when the publisher is gone.
    pub async fn recv(&mut self) -> Option<TimeUpdate> {
        let rx = self.rx.as_mut()?;
        loop {
            match rx.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Broadcast receiver lagged, skipping ahead");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn is_registered(&self) -> bool {
        self.rx.is_some()
    }

    /// Stop receiving updates. Unregistering twice is ignored.
    pub fn unregister(&mut self) {
        if self.rx.take().is_none() {
            debug!("Broadcast receiver was not registered, ignoring unregister");
        }
    }
}
