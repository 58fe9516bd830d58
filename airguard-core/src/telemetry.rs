//! Telemetry payload and the publisher seam
//!
//! The payload keeps the field names existing dashboards subscribe to:
//!
//! ```json
//! {"TVOC":15,"eCO2":450,"baseline_TVOC":36821,"baseline_eCO2":35187,
//!  "temp_c":25.0,"relative_humidity":40.0,
//!  "started_at":1700000000.0,"timestamp":1700000060.0}
//! ```
//!
//! Timestamps are seconds since the Unix epoch as floating point.

use serde::Serialize;

use crate::errors::PublishError;
use crate::pipeline::Reading;
use crate::time::{as_epoch_seconds, Timestamp};

/// One published reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryPayload {
    /// TVOC in ppb
    #[serde(rename = "TVOC")]
    pub tvoc: u16,
    /// eCO2 in ppm
    #[serde(rename = "eCO2")]
    pub eco2: u16,
    /// TVOC baseline counter
    #[serde(rename = "baseline_TVOC")]
    pub baseline_tvoc: u16,
    /// eCO2 baseline counter
    #[serde(rename = "baseline_eCO2")]
    pub baseline_eco2: u16,
    /// Temperature in °C
    pub temp_c: f32,
    /// Relative humidity in %
    pub relative_humidity: f32,
    /// Process start, epoch seconds
    pub started_at: f64,
    /// Publish time, epoch seconds
    pub timestamp: f64,
}

impl TelemetryPayload {
    /// Payload for `reading`, published at `now` by a process started at `started_at`
    pub fn from_reading(reading: &Reading, started_at: Timestamp, now: Timestamp) -> Self {
        Self {
            tvoc: reading.tvoc_ppb,
            eco2: reading.eco2_ppm,
            baseline_tvoc: reading.baseline.tvoc,
            baseline_eco2: reading.baseline.eco2,
            temp_c: reading.temperature_c,
            relative_humidity: reading.relative_humidity_pct,
            started_at: as_epoch_seconds(started_at),
            timestamp: as_epoch_seconds(now),
        }
    }
}

/// Hands payloads to the pub/sub transport
///
/// Implementations must not block on network I/O: delivery, retention and
/// reconnects belong to the transport.
pub trait TelemetryPublisher {
    /// Queue one payload for retained delivery
    fn publish(&mut self, payload: &TelemetryPayload) -> Result<(), PublishError>;
}

impl<P: TelemetryPublisher + ?Sized> TelemetryPublisher for &mut P {
    fn publish(&mut self, payload: &TelemetryPayload) -> Result<(), PublishError> {
        (**self).publish(payload)
    }
}
