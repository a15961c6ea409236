//! Signal handling: shutdown and external timer commands

use std::sync::Arc;

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook_tokio::Signals;
use tracing::{info, warn};

use crate::{host::HostCommand, state::AppState};

/// What a received signal asks the daemon to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Shutdown,
    Command(HostCommand),
    Ignore,
}

/// Map a signal number to its action
pub fn signal_action(signal: i32) -> SignalAction {
    match signal {
        SIGTERM | SIGINT => SignalAction::Shutdown,
        SIGUSR1 => SignalAction::Command(HostCommand::RequestStart),
        SIGUSR2 => SignalAction::Command(HostCommand::RequestStop),
        _ => SignalAction::Ignore,
    }
}

/// Install handlers for every signal the daemon reacts to.
///
/// Call this before serving so a registration failure aborts startup.
pub fn register_signals() -> std::io::Result<Signals> {
    Signals::new([SIGTERM, SIGINT, SIGUSR1, SIGUSR2])
}

/// Serve signals until a shutdown signal (SIGTERM, SIGINT) arrives.
///
/// SIGUSR1 and SIGUSR2 are forwarded to the timer as `RequestStart` and
/// `RequestStop`.
pub async fn handle_signals(mut signals: Signals, state: Arc<AppState>) {
    while let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
        match signal_action(signal) {
            SignalAction::Shutdown => break,
            SignalAction::Command(command) => match state.timer.execute(command).await {
                Ok(snapshot) => {
                    state.record_action(command.name());
                    info!("{} via signal, timer at {}", command.name(), snapshot.formatted_time());
                }
                Err(e) => warn!("Failed to run {} from signal: {}", command.name(), e),
            },
            SignalAction::Ignore => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use signal_hook::low_level::raise;

    use super::*;
    use crate::{host::TimerHost, store::MemoryVitalStore, testing::RecordingEnvironment};

    #[test]
    fn maps_signals_to_actions() {
        assert_eq!(signal_action(SIGTERM), SignalAction::Shutdown);
        assert_eq!(signal_action(SIGINT), SignalAction::Shutdown);
        assert_eq!(
            signal_action(SIGUSR1),
            SignalAction::Command(HostCommand::RequestStart)
        );
        assert_eq!(
            signal_action(SIGUSR2),
            SignalAction::Command(HostCommand::RequestStop)
        );
        assert_eq!(signal_action(signal_hook::consts::SIGHUP), SignalAction::Ignore);
    }

    #[tokio::test]
    async fn user_signals_drive_timer_until_terminate() {
        let state = Arc::new(AppState::new(
            TimerHost::spawn(Arc::new(RecordingEnvironment::default())),
            Arc::new(MemoryVitalStore::new()),
            20554,
            "127.0.0.1".to_string(),
        ));
        let signals = register_signals().unwrap();
        let handler = tokio::spawn(handle_signals(signals, Arc::clone(&state)));

        let mut binding = state.timer.bind();
        raise(SIGUSR1).unwrap();
        let running = tokio::time::timeout(Duration::from_secs(5), binding.changed_running())
            .await
            .unwrap();
        assert_eq!(running, Some(true));

        raise(SIGUSR2).unwrap();
        let running = tokio::time::timeout(Duration::from_secs(5), binding.changed_running())
            .await
            .unwrap();
        assert_eq!(running, Some(false));

        raise(SIGTERM).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handler)
            .await
            .unwrap()
            .unwrap();
        state.timer.shutdown().await;
    }
}
