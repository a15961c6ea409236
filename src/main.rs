//! Vitals Timer - a background stopwatch daemon for a personal vitals tracker
//!
//! This is the main entry point for the vitals-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use vitals_timer::{
    api::create_router,
    config::Config,
    handle_signals,
    host::TimerHost,
    register_signals,
    services::SystemEnvironment,
    state::AppState,
    store::MemoryVitalStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("vitals_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting vitals-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, autostart={}, inhibit={}",
        config.host, config.port, config.autostart, config.inhibit
    );

    let environment = Arc::new(SystemEnvironment::new(
        config.inhibit,
        config.status_file.clone(),
    ));
    let timer = TimerHost::spawn(environment);
    let vitals = Arc::new(MemoryVitalStore::new());
    let state = Arc::new(AppState::new(timer, vitals, config.port, config.host.clone()));

    if config.autostart {
        state.timer.request_start().await?;
        state.record_action("autostart");
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start   - RequestStart");
    info!("  POST   /timer/stop    - RequestStop");
    info!("  POST   /timer/command - Named command");
    info!("  GET    /timer         - Current timer values");
    info!("  GET    /timer/watch   - SSE, direct binding");
    info!("  GET    /timer/events  - SSE, broadcast");
    info!("  *      /vitals        - Vitals entries");
    info!("  GET    /status        - Daemon status");
    info!("  GET    /health        - Health check");

    let signals = register_signals()?;
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = handle_signals(signals, Arc::clone(&state)) => {
            info!("Shutdown signal received");
        }
    }

    // Host teardown always stops the timer first.
    state.timer.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}
