//! Lifecycle host for the stopwatch
//!
//! [`TimerHost`] owns the stopwatch task for the life of the process.
//! Observers come and go through [`TimerHost::bind`] and
//! [`TimerHost::subscribe`]; none of them own the timer, so dropping every
//! binding leaves it running. Tearing the host down always stops it first.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    error::TimerError,
    services::HostEnvironment,
    state::{publisher, Observers, TimeUpdateReceiver, TimerSnapshot, TimerView},
    tasks::{SleepTicks, Stopwatch, StopwatchCommand, TickSource},
};

/// Named commands accepted from outside the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    RequestStart,
    RequestStop,
}

impl HostCommand {
    /// Parse a command name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RequestStart" => Some(Self::RequestStart),
            "RequestStop" => Some(Self::RequestStop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RequestStart => "RequestStart",
            Self::RequestStop => "RequestStop",
        }
    }
}

/// Handle that keeps the stopwatch task alive.
///
/// Dropping the host closes the command channel, which also stops the task.
pub struct TimerHost {
    commands: mpsc::UnboundedSender<StopwatchCommand>,
    observers: Observers,
    bound: Arc<AtomicUsize>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TimerHost {
    /// Spawn the stopwatch with one-second ticks
    pub fn spawn(environment: Arc<dyn HostEnvironment>) -> Self {
        Self::spawn_with(SleepTicks::default(), environment)
    }

    /// Spawn the stopwatch with a custom tick source
    pub fn spawn_with<T: TickSource>(ticks: T, environment: Arc<dyn HostEnvironment>) -> Self {
        let (publisher, observers) = publisher::channel(environment);
        let (commands, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(Stopwatch::new(ticks, publisher).run(rx));

        info!("Timer host created");
        Self {
            commands,
            observers,
            bound: Arc::new(AtomicUsize::new(0)),
            task: Mutex::new(Some(task)),
        }
    }

    async fn send(
        &self,
        make: impl FnOnce(oneshot::Sender<TimerSnapshot>) -> StopwatchCommand,
    ) -> Result<TimerSnapshot, TimerError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(make(ack_tx))
            .map_err(|_| TimerError::HostGone)?;
        ack_rx.await.map_err(|_| TimerError::HostGone)
    }

    /// `RequestStart`: start the stopwatch, or do nothing if it runs
    pub async fn request_start(&self) -> Result<TimerSnapshot, TimerError> {
        debug!("RequestStart received");
        self.send(StopwatchCommand::Start).await
    }

    /// `RequestStop`: stop and reset the stopwatch, or do nothing if stopped
    pub async fn request_stop(&self) -> Result<TimerSnapshot, TimerError> {
        debug!("RequestStop received");
        self.send(StopwatchCommand::Stop).await
    }

    pub async fn execute(&self, command: HostCommand) -> Result<TimerSnapshot, TimerError> {
        match command {
            HostCommand::RequestStart => self.request_start().await,
            HostCommand::RequestStop => self.request_stop().await,
        }
    }

    /// Run a command by name. Unknown names are ignored and yield `None`.
    pub async fn dispatch(&self, name: &str) -> Result<Option<TimerSnapshot>, TimerError> {
        match HostCommand::from_name(name) {
            Some(command) => self.execute(command).await.map(Some),
            None => {
                warn!("Ignoring unknown timer command: {:?}", name);
                Ok(None)
            }
        }
    }

    /// Attach a direct observer
    pub fn bind(&self) -> TimerBinding {
        let mut time_rx = self.observers.time_rx.clone();
        let mut running_rx = self.observers.running_rx.clone();
        // Current values are read on demand; only later changes count as new.
        time_rx.borrow_and_update();
        running_rx.borrow_and_update();

        self.bound.fetch_add(1, Ordering::SeqCst);
        TimerBinding {
            time_rx,
            running_rx,
            bound: Arc::clone(&self.bound),
        }
    }

    /// Number of live bindings
    pub fn bound_observers(&self) -> usize {
        self.bound.load(Ordering::SeqCst)
    }

    /// Register a receiver on the broadcast path
    pub fn subscribe(&self) -> TimeUpdateReceiver {
        self.observers.subscribe()
    }

    /// Latest published values
    pub fn view(&self) -> TimerView {
        self.observers.view()
    }

    /// Tear the host down: force a stop, then wait for the task to end.
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        let task = match self.task.lock() {
            Ok(mut task) => task.take(),
            Err(e) => {
                warn!("Timer task handle lock poisoned: {}", e);
                None
            }
        };
        let Some(task) = task else {
            debug!("Timer host already shut down");
            return;
        };

        match self.send(StopwatchCommand::Shutdown).await {
            Ok(_) => info!("Timer stopped for host teardown"),
            Err(e) => warn!("Timer task ended before teardown: {}", e),
        }
        if let Err(e) = task.await {
            warn!("Timer task did not exit cleanly: {}", e);
        }
    }
}

/// A direct observer of the running stopwatch.
///
/// Dropping it (or calling [`TimerBinding::unbind`]) detaches the observer
/// without affecting the timer.
#[derive(Debug)]
pub struct TimerBinding {
    time_rx: watch::Receiver<String>,
    running_rx: watch::Receiver<bool>,
    bound: Arc<AtomicUsize>,
}

impl TimerBinding {
    pub fn formatted_time(&self) -> String {
        self.time_rx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        *self.running_rx.borrow()
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            formatted_time: self.formatted_time(),
            is_running: self.is_running(),
        }
    }

    /// Wait for the formatted time to change and return the new value.
    ///
    /// Returns `None` once the stopwatch task is gone.
    pub async fn changed_time(&mut self) -> Option<String> {
        self.time_rx.changed().await.ok()?;
        Some(self.time_rx.borrow_and_update().clone())
    }

    /// Wait for the running flag to change and return the new value
    pub async fn changed_running(&mut self) -> Option<bool> {
        self.running_rx.changed().await.ok()?;
        Some(*self.running_rx.borrow_and_update())
    }

    /// Wait for either value to change and return the combined view
    pub async fn changed(&mut self) -> Option<TimerView> {
        tokio::select! {
            result = self.time_rx.changed() => result.ok()?,
            result = self.running_rx.changed() => result.ok()?,
        }
        Some(TimerView {
            formatted_time: self.time_rx.borrow_and_update().clone(),
            is_running: *self.running_rx.borrow_and_update(),
        })
    }

    pub fn unbind(self) {}
}

impl Drop for TimerBinding {
    fn drop(&mut self) {
        self.bound.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::RunState;
    use crate::testing::{FailingTicks, RecordingEnvironment};
    use tokio::time::sleep;

    fn host() -> (TimerHost, Arc<RecordingEnvironment>) {
        let env = Arc::new(RecordingEnvironment::default());
        (TimerHost::spawn(env.clone()), env)
    }

    #[tokio::test(start_paused = true)]
    async fn start_wait_restart_then_stop_scenario() {
        let (host, env) = host();
        let binding = host.bind();

        host.request_start().await.unwrap();
        sleep(Duration::from_millis(3500)).await;
        let snapshot = host.request_start().await.unwrap();
        assert_eq!(snapshot.elapsed_seconds, 3);
        assert_eq!(binding.formatted_time(), "00:00:03");

        let snapshot = host.request_stop().await.unwrap();
        assert_eq!(snapshot.run_state, RunState::Stopped);
        assert_eq!(binding.formatted_time(), "00:00:00");
        assert!(!binding.is_running());
        assert!(!env.is_kept_alive());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_start_is_a_quiet_no_op() {
        let (host, env) = host();

        let snapshot = host.request_stop().await.unwrap();

        assert_eq!(snapshot, TimerSnapshot::new());
        assert!(env.kept_alive_changes().is_empty());
        assert!(env.statuses().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_state_follows_last_command_for_every_sequence() {
        for len in 1..=4u32 {
            for bits in 0..(1u32 << len) {
                let (host, env) = host();
                let mut last_start = false;
                for i in 0..len {
                    last_start = bits & (1 << i) != 0;
                    if last_start {
                        host.request_start().await.unwrap();
                    } else {
                        host.request_stop().await.unwrap();
                    }
                }
                assert_eq!(host.view().is_running, last_start, "sequence {bits:b}");
                assert_eq!(env.is_kept_alive(), last_start, "sequence {bits:b}");
                host.shutdown().await;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_advance_exactly_one_second_each() {
        let (host, _env) = host();
        let mut binding = host.bind();

        host.request_start().await.unwrap();
        for expected in 1..=5u64 {
            let time = binding.changed_time().await.unwrap();
            assert_eq!(time, crate::state::format_elapsed(expected));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_binding_sees_current_values() {
        let (host, _env) = host();
        host.request_start().await.unwrap();
        sleep(Duration::from_millis(2500)).await;

        let binding = host.bind();

        assert!(binding.is_running());
        assert_eq!(binding.formatted_time(), "00:00:02");
    }

    #[tokio::test(start_paused = true)]
    async fn unbinding_everyone_keeps_timer_running() {
        let (host, env) = host();
        let first = host.bind();
        let second = host.bind();
        assert_eq!(host.bound_observers(), 2);

        host.request_start().await.unwrap();
        first.unbind();
        drop(second);
        assert_eq!(host.bound_observers(), 0);

        sleep(Duration::from_millis(4500)).await;
        let binding = host.bind();
        assert!(binding.is_running());
        assert_eq!(binding.formatted_time(), "00:00:04");
        assert!(env.is_kept_alive());
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_receives_transitions_and_ticks() {
        let (host, _env) = host();
        let mut rx = host.subscribe();

        host.request_start().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().formatted_time, "00:00:00");
        assert_eq!(rx.recv().await.unwrap().formatted_time, "00:00:01");

        host.request_stop().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().formatted_time, "00:00:00");

        rx.unregister();
        rx.unregister();
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_ignores_unknown_commands() {
        let (host, env) = host();

        assert!(host.dispatch("Pause").await.unwrap().is_none());
        assert!(host.dispatch("requeststart").await.unwrap().is_none());
        assert!(!host.view().is_running);
        assert!(env.statuses().is_empty());

        let snapshot = host.dispatch("RequestStart").await.unwrap().unwrap();
        assert!(snapshot.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ongoing_status_tracks_elapsed_time() {
        let (host, env) = host();

        host.request_start().await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(env.last_status().as_deref(), Some("Elapsed time: 00:00:01"));

        host.request_stop().await.unwrap();
        assert_eq!(env.last_status(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_forces_stop_and_rejects_later_commands() {
        let (host, env) = host();
        let binding = host.bind();
        host.request_start().await.unwrap();
        sleep(Duration::from_millis(1500)).await;

        host.shutdown().await;
        host.shutdown().await;

        assert!(!binding.is_running());
        assert_eq!(binding.formatted_time(), "00:00:00");
        assert!(!env.is_kept_alive());
        assert!(matches!(
            host.request_start().await,
            Err(TimerError::HostGone)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_failure_never_leaves_timer_running() {
        let env = Arc::new(RecordingEnvironment::default());
        let host = TimerHost::spawn_with(FailingTicks, env.clone());
        let mut binding = host.bind();

        host.request_start().await.unwrap();
        while binding.is_running() {
            binding.changed_running().await.unwrap();
        }

        assert_eq!(binding.formatted_time(), "00:00:00");
        assert_eq!(env.kept_alive_changes(), vec![true, false]);
    }

    #[test]
    fn command_names_round_trip() {
        for command in [HostCommand::RequestStart, HostCommand::RequestStop] {
            assert_eq!(HostCommand::from_name(command.name()), Some(command));
        }
        assert_eq!(HostCommand::from_name("Reset"), None);
    }
}
