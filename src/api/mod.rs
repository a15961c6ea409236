//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod events;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use events::{broadcast_handler, watch_handler};
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/stop", post(stop_handler))
        .route("/timer/command", post(command_handler))
        .route("/timer/watch", get(watch_handler))
        .route("/timer/events", get(broadcast_handler))
        .route(
            "/vitals",
            get(list_vitals_handler)
                .post(create_vital_handler)
                .delete(delete_all_vitals_handler),
        )
        .route(
            "/vitals/:id",
            put(update_vital_handler).delete(delete_vital_handler),
        )
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
