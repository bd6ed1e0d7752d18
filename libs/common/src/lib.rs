//! Shared helpers for the panel operator tools
//!
//! - logging: stderr subscriber with bracketed levels
//! - shutdown: SIGINT/SIGTERM handling

pub mod logging;
pub mod shutdown;
