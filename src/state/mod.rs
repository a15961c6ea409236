//! State management module
//!
//! Timer data model, the publisher that fans it out to observers, and the
//! shared application state handed to HTTP handlers.

pub mod app_state;
pub mod publisher;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use publisher::{Observers, Publisher, TimeUpdate, TimeUpdateReceiver, TIME_UPDATE_EVENT};
pub use timer_state::{format_elapsed, ongoing_status_text, RunState, TimerSnapshot, TimerView};
