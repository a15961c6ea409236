//! Host environment services module
//!
//! This module contains the kept-alive and ongoing-status integration with
//! the operating system.

pub mod keep_alive;

// Re-export main types
pub use keep_alive::{HostEnvironment, SystemEnvironment};
