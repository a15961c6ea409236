//! Vitals Timer - a background stopwatch daemon for a personal vitals tracker
//!
//! The stopwatch keeps counting independently of whoever is watching it.
//! Observers bind to it directly or listen on a broadcast path, and a small
//! HTTP surface exposes the timer commands and the vitals store.

pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use host::{HostCommand, TimerBinding, TimerHost};
pub use state::AppState;
pub use utils::signals::{handle_signals, register_signals};
