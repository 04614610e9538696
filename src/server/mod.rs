//! Engine wiring: environment-driven configuration and the scheduler that
//! spawns the periodic services.

pub mod config;
pub mod scheduler;
