//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    host::HostCommand,
    state::AppState,
    store::{NewVitalEntry, VitalEntry},
};
use super::responses::{
    ApiResponse, CommandRequest, DeletedResponse, HealthResponse, StatusResponse, TimerBody,
};

async fn run_command(state: &AppState, command: HostCommand) -> Result<ApiResponse, ApiError> {
    let snapshot = state.timer.execute(command).await?;
    state.record_action(command.name());
    Ok(ApiResponse::from_snapshot(
        format!("{} handled", command.name()),
        snapshot,
    ))
}

/// Handle POST /timer/start - Start the stopwatch
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    info!("Start endpoint called");
    run_command(&state, HostCommand::RequestStart).await.map(Json)
}

/// Handle POST /timer/stop - Stop and reset the stopwatch
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    info!("Stop endpoint called");
    run_command(&state, HostCommand::RequestStop).await.map(Json)
}

/// Handle POST /timer/command - Run a named command, ignoring unknown names
pub async fn command_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    match HostCommand::from_name(&request.command) {
        Some(command) => run_command(&state, command).await.map(Json),
        None => {
            info!("Ignoring unknown command {:?}", request.command);
            Ok(Json(ApiResponse::ignored(
                format!("Unknown command '{}' ignored", request.command),
                state.timer.view(),
            )))
        }
    }
}

/// Handle GET /timer - Current published timer values
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<TimerBody> {
    Json(state.timer.view().into())
}

/// Handle GET /vitals - All entries, newest first
pub async fn list_vitals_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VitalEntry>>, ApiError> {
    Ok(Json(state.vitals.list_all()?))
}

/// Handle POST /vitals - Record a new entry
pub async fn create_vital_handler(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<NewVitalEntry>,
) -> Result<(StatusCode, Json<VitalEntry>), ApiError> {
    let entry = state.vitals.insert(entry)?;
    state.record_action("vitals-insert");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handle PUT /vitals/:id - Replace an entry
pub async fn update_vital_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(mut entry): Json<VitalEntry>,
) -> Result<Json<VitalEntry>, ApiError> {
    entry.id = id;
    let entry = state.vitals.update(entry)?;
    state.record_action("vitals-update");
    Ok(Json(entry))
}

/// Handle DELETE /vitals/:id - Remove an entry
pub async fn delete_vital_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.vitals.delete(id)?;
    state.record_action("vitals-delete");
    Ok(StatusCode::NO_CONTENT)
}

/// Handle DELETE /vitals - Remove every entry
pub async fn delete_all_vitals_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.vitals.delete_all()?;
    state.record_action("vitals-delete-all");
    Ok(Json(DeletedResponse { deleted }))
}

/// Handle GET /status - Return current status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let vital_entries = state.vitals.list_all()?.len();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: state.timer.view().into(),
        bound_observers: state.timer.bound_observers(),
        vital_entries,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
