//! Error Types for the Sampling and Calibration Engine
//!
//! ## Error Categories
//!
//! The daemon distinguishes three kinds of failure, and the types here are
//! laid out so the category is visible from the variant alone:
//!
//! ### Recoverable locally
//! - A missing or corrupt baseline record. This never surfaces as an error
//!   value at all: [`crate::store::BaselineStore::load`] reports it as `None`
//!   and the node starts uncalibrated.
//! - `StoreError` on save: logged, retried on the next baseline tick.
//! - `PublishError::Backpressure`: the transport queue is full, the reading
//!   is dropped and the next publish interval tries again.
//!
//! ### Fatal
//! - `SensorError`: bus read/write failures. The I2C layer needs a cold
//!   re-initialisation which only a process restart provides.
//! - `PublishError::Closed`: the transport's event loop is gone.
//!
//! ### Expected termination
//! - Not an error. The bootstrap exit is reported through
//!   [`crate::daemon::TickControl::Terminate`].
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use airguard_core::{DaemonError, TickControl};
//!
//! fn exit_code(result: Result<TickControl, DaemonError>) -> Option<i32> {
//!     match result {
//!         Ok(TickControl::Continue) => None,
//!         Ok(TickControl::Terminate(_)) => Some(0),
//!         Err(DaemonError::Sensor(_)) => Some(1),
//!         Err(DaemonError::Publish(_)) => Some(2),
//!     }
//! }
//! ```

use alloc::string::String;
use thiserror_no_std::Error;

/// Sensor bus failures - kept small, these are returned from the hot path
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Reading a measurement or register failed
    #[error("{sensor}: {operation} failed: {details}")]
    ReadFailed {
        /// Sensor part name (e.g. "SHT4x")
        sensor: &'static str,
        /// What was being attempted
        operation: &'static str,
        /// Driver supplied detail
        details: &'static str,
    },

    /// Writing a command or compensation value failed
    #[error("{sensor}: {operation} failed: {details}")]
    WriteFailed {
        /// Sensor part name (e.g. "SGP30")
        sensor: &'static str,
        /// What was being attempted
        operation: &'static str,
        /// Driver supplied detail
        details: &'static str,
    },
}

/// Baseline persistence failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file I/O failed
    #[cfg(feature = "std")]
    #[error("baseline record I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Store could not accept the write
    #[error("baseline store unavailable: {reason}")]
    Unavailable {
        /// Why the store refused
        reason: &'static str,
    },
}

/// Telemetry hand-off failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Transport request queue is full; this reading is dropped
    #[error("transport queue full, reading dropped")]
    Backpressure,

    /// Transport has shut down and will never deliver again
    #[error("transport closed")]
    Closed,

    /// Payload could not be serialised
    #[error("payload encoding failed: {0}")]
    Encode(String),
}

impl PublishError {
    /// Whether the daemon can keep running after this failure
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Backpressure)
    }
}

/// Anything that ends the daemon loop with a non-zero exit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DaemonError {
    /// Sensor bus fault
    #[error("sensor fault: {0}")]
    Sensor(#[from] SensorError),

    /// Unrecoverable transport fault
    #[error("publish fault: {0}")]
    Publish(#[from] PublishError),
}
