//! Stopwatch background task
//!
//! The task is the only writer of the elapsed counter and run state.
//! Callers talk to it through [`StopwatchCommand`]s; every change is pushed
//! out through the [`Publisher`].

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use super::clock::TickSource;
use crate::{
    error::TickError,
    state::{Publisher, RunState, TimerSnapshot},
};

/// Commands accepted by the stopwatch task, each acknowledged with the
/// resulting snapshot
#[derive(Debug)]
pub enum StopwatchCommand {
    Start(oneshot::Sender<TimerSnapshot>),
    Stop(oneshot::Sender<TimerSnapshot>),
    /// Force a stop and end the task
    Shutdown(oneshot::Sender<TimerSnapshot>),
}

type PendingTick = BoxFuture<'static, Result<(), TickError>>;

/// State owned by the stopwatch task
pub struct Stopwatch<T: TickSource> {
    snapshot: TimerSnapshot,
    ticks: T,
    /// Outstanding tick wait; present only while running
    pending: Option<PendingTick>,
    publisher: Publisher,
}

impl<T: TickSource> Stopwatch<T> {
    pub fn new(ticks: T, publisher: Publisher) -> Self {
        Self {
            snapshot: TimerSnapshot::new(),
            ticks,
            pending: None,
            publisher,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot
    }

    /// Begin running. No-op when already running.
    pub fn start(&mut self) {
        if self.snapshot.is_running() {
            debug!("Start requested while running, ignoring");
            return;
        }

        info!("Stopwatch started");
        self.snapshot.run_state = RunState::Running;
        self.publisher.publish(&self.snapshot);
        self.pending = Some(self.ticks.next_tick());
    }

    /// Stop and reset to zero. No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.snapshot.is_running() {
            debug!("Stop requested while stopped, ignoring");
            return;
        }

        // Dropping the pending wait cancels it before anything else is published.
        self.pending = None;
        info!(
            "Stopwatch stopped at {}",
            self.snapshot.formatted_time()
        );
        self.snapshot = TimerSnapshot::new();
        self.publisher.publish(&self.snapshot);
    }

    fn on_tick(&mut self, result: Result<(), TickError>) {
        if let Err(e) = result {
            error!("Tick failed, forcing stop: {}", e);
            self.stop();
            return;
        }
        if !self.snapshot.is_running() {
            return;
        }

        self.snapshot.elapsed_seconds += 1;
        self.publisher.publish(&self.snapshot);
        self.pending = Some(self.ticks.next_tick());
    }

    /// Run the command/tick loop until shutdown or until every command
    /// sender is gone. Always ends stopped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<StopwatchCommand>) {
        info!("Starting stopwatch task");

        loop {
            // Commands win over a tick that is ready at the same time, so a
            // queued stop drops the tick before it can publish.
            tokio::select! {
                biased;

                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("All command senders dropped");
                        break;
                    };
                    match command {
                        StopwatchCommand::Start(ack) => {
                            self.start();
                            let _ = ack.send(self.snapshot);
                        }
                        StopwatchCommand::Stop(ack) => {
                            self.stop();
                            let _ = ack.send(self.snapshot);
                        }
                        StopwatchCommand::Shutdown(ack) => {
                            self.stop();
                            let _ = ack.send(self.snapshot);
                            break;
                        }
                    }
                }
                result = next_tick(&mut self.pending) => {
                    self.pending = None;
                    self.on_tick(result);
                }
            }
        }

        self.stop();
        info!("Stopwatch task finished");
    }
}

/// Await the outstanding tick, or never resolve when there is none
async fn next_tick(pending: &mut Option<PendingTick>) -> Result<(), TickError> {
    match pending.as_mut() {
        Some(tick) => tick.await,
        None => std::future::pending().await,
    }
}
