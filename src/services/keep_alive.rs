//! Host environment: kept-alive status and the ongoing-status surface

use std::{io::ErrorKind, path::PathBuf, sync::Mutex};

use tokio::{
    process::{Child, Command},
    sync::watch,
};
use tracing::{debug, info, warn};

/// Capabilities the surrounding environment offers to the timer host.
///
/// The publisher calls `set_kept_alive` only on Running/Stopped edges, and
/// `publish_ongoing_status` on every publish (`None` clears the surface).
pub trait HostEnvironment: Send + Sync {
    fn set_kept_alive(&self, kept_alive: bool);
    fn publish_ongoing_status(&self, text: Option<&str>);
}

/// Environment for a Linux daemon.
///
/// While kept alive it can hold a `systemd-inhibit` lock against sleep and
/// idle suspension, and it can mirror the status text into a file. File
/// writes happen on a separate task that only ever applies the latest text.
#[derive(Debug, Default)]
pub struct SystemEnvironment {
    inhibit: bool,
    status_tx: Option<watch::Sender<Option<String>>>,
    inhibitor: Mutex<Option<Child>>,
}

impl SystemEnvironment {
    /// Must be called inside a tokio runtime when `status_file` is set.
    pub fn new(inhibit: bool, status_file: Option<PathBuf>) -> Self {
        let status_tx = status_file.map(|path| {
            let (tx, rx) = watch::channel(None);
            tokio::spawn(write_status_file(path, rx));
            tx
        });

        Self {
            inhibit,
            status_tx,
            inhibitor: Mutex::new(None),
        }
    }

    /// Whether an inhibitor process is currently held
    #[cfg(test)]
    pub fn is_inhibiting(&self) -> bool {
        self.inhibitor
            .lock()
            .map(|child| child.is_some())
            .unwrap_or(false)
    }

    fn acquire_inhibitor(&self) {
        let Ok(mut slot) = self.inhibitor.lock() else {
            warn!("Inhibitor lock poisoned, not acquiring sleep inhibitor");
            return;
        };
        if slot.is_some() {
            return;
        }

        let spawned = Command::new("systemd-inhibit")
            .args([
                "--what=sleep:idle",
                "--who=vitals-timer",
                "--why=Stopwatch running",
                "--mode=block",
                "sleep",
                "infinity",
            ])
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                info!("Sleep inhibitor acquired (pid {:?})", child.id());
                *slot = Some(child);
            }
            Err(e) => warn!("Failed to spawn systemd-inhibit: {}", e),
        }
    }

    fn release_inhibitor(&self) {
        let Ok(mut slot) = self.inhibitor.lock() else {
            warn!("Inhibitor lock poisoned, cannot release sleep inhibitor");
            return;
        };
        if let Some(mut child) = slot.take() {
            if let Err(e) = child.start_kill() {
                warn!("Failed to kill systemd-inhibit: {}", e);
            } else {
                info!("Sleep inhibitor released");
            }
        }
    }
}

/// Keep `path` in line with the latest status text until the sender is gone.
///
/// `None` removes the file.
async fn write_status_file(path: PathBuf, mut status_rx: watch::Receiver<Option<String>>) {
    loop {
        let text = status_rx.borrow_and_update().clone();
        let result = match text {
            Some(text) => tokio::fs::write(&path, format!("{}\n", text)).await,
            None => match tokio::fs::remove_file(&path).await {
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        if let Err(e) = result {
            warn!("Failed to update status file {}: {}", path.display(), e);
        }

        if status_rx.changed().await.is_err() {
            debug!("Status file writer finished");
            break;
        }
    }
}

impl HostEnvironment for SystemEnvironment {
    fn set_kept_alive(&self, kept_alive: bool) {
        info!("Kept-alive status: {}", kept_alive);
        if !self.inhibit {
            return;
        }
        if kept_alive {
            self.acquire_inhibitor();
        } else {
            self.release_inhibitor();
        }
    }

    fn publish_ongoing_status(&self, text: Option<&str>) {
        match text {
            Some(text) => debug!("Ongoing status: {}", text),
            None => debug!("Ongoing status cleared"),
        }
        if let Some(status_tx) = &self.status_tx {
            status_tx.send_replace(text.map(str::to_string));
        }
    }
}

impl Drop for SystemEnvironment {
    fn drop(&mut self) {
        self.release_inhibitor();
    }
}
