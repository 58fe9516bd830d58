//! AirGuard daemon
//!
//! Wires the sampling engine to its process environment: configuration from
//! environment variables, the baseline file, the MQTT connector and a
//! one-second tick driven by tokio.

pub mod config;
pub mod runner;
pub mod sim;

pub use config::{ConfigError, DaemonConfig};
pub use runner::{exit_code, run, TICK_PERIOD};
