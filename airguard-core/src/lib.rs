//! Scheduling and calibration-lifecycle engine for AirGuard
//!
//! Drives one air-quality sensor node: a climate sensor feeding humidity
//! compensation into a drift-prone metal-oxide gas sensor, a pair of
//! wall-clock aligned timers, and the gas sensor's calibration baseline
//! checkpoint that has to survive restarts.
//!
//! Key constraints:
//! - One cooperative tick per second, no parallelism inside the core
//! - The only durable state is a single `"<eCO2>,<TVOC>"` record
//! - Every failure except a missing/corrupt checkpoint is fatal
//!
//! ```no_run
//! use core::time::Duration;
//! use airguard_core::scheduler::{next_aligned_fire_time, ScheduleTimer};
//!
//! let mut publish = ScheduleTimer::new("publish", Duration::from_secs(60), 1_000);
//! assert_eq!(next_aligned_fire_time(Duration::from_secs(60), 1_000), 60_000);
//! if publish.poll(60_000) {
//!     // publish telemetry
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod calibration;
pub mod daemon;
pub mod errors;
pub mod pipeline;
pub mod scheduler;
pub mod sensors;
pub mod store;
pub mod telemetry;
pub mod time;

// Public API
pub use calibration::{CalibrationOutcome, CalibrationState, CalibrationStateMachine};
pub use daemon::{Daemon, DaemonSettings, DaemonState, ExitReason, TickControl};
pub use errors::{DaemonError, PublishError, SensorError, StoreError};
pub use pipeline::{CompensatedReadingPipeline, Reading};
pub use scheduler::{next_aligned_fire_time, ScheduleTimer};
pub use sensors::{ClimateReading, ClimateSensor, GasReading, GasSensor};
pub use store::{BaselineStore, CalibrationBaseline, MemoryBaselineStore};
#[cfg(feature = "std")]
pub use store::FileBaselineStore;
pub use telemetry::{TelemetryPayload, TelemetryPublisher};
pub use time::{Timestamp, TimeSource};

/// Crate version, logged at daemon startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
