//! One compensated measurement cycle
//!
//! ```text
//! climate sensor ──(T, RH)──► gas sensor compensation ──► gas measure ──► baseline read-back
//! ```
//!
//! The order is fixed: the gas estimate is only accurate when compensation
//! was written before the measurement command. Any sensor error aborts the
//! cycle and is handed up unchanged; there are no retries here because a
//! failing bus needs a cold re-initialisation, which only a restart gives.

use crate::errors::SensorError;
use crate::sensors::{ClimateSensor, GasSensor};
use crate::store::CalibrationBaseline;
use crate::time::Timestamp;

/// Everything sampled in one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Air temperature in °C
    pub temperature_c: f32,
    /// Relative humidity in %
    pub relative_humidity_pct: f32,
    /// Equivalent CO2 in ppm
    pub eco2_ppm: u16,
    /// TVOC in ppb
    pub tvoc_ppb: u16,
    /// Gas sensor baseline right after this measurement
    pub baseline: CalibrationBaseline,
    /// When the cycle ran
    pub sampled_at: Timestamp,
}

/// Climate sensor feeding humidity compensation into a gas sensor
pub struct CompensatedReadingPipeline<C, G> {
    climate: C,
    gas: G,
}

impl<C: ClimateSensor, G: GasSensor> CompensatedReadingPipeline<C, G> {
    /// Pipeline over two initialised sensors
    pub fn new(climate: C, gas: G) -> Self {
        Self { climate, gas }
    }

    /// Run one cycle: climate read, compensation write, gas read, baseline read
    pub fn read_cycle(&mut self, now: Timestamp) -> Result<Reading, SensorError> {
        let climate = self.climate.read_climate()?;
        self.gas.set_humidity_compensation(&climate)?;
        let gas = self.gas.measure()?;
        let baseline = self.gas.baseline()?;

        log::trace!(
            "cycle: {:.2}C {:.2}% -> eCO2 {} ppm, TVOC {} ppb, baseline {}",
            climate.temperature_c,
            climate.relative_humidity_pct,
            gas.eco2_ppm,
            gas.tvoc_ppb,
            baseline
        );

        Ok(Reading {
            temperature_c: climate.temperature_c,
            relative_humidity_pct: climate.relative_humidity_pct,
            eco2_ppm: gas.eco2_ppm,
            tvoc_ppb: gas.tvoc_ppb,
            baseline,
            sampled_at: now,
        })
    }

    /// Gas sensor, for baseline restore at startup
    pub fn gas_sensor_mut(&mut self) -> &mut G {
        &mut self.gas
    }

    /// Climate sensor
    pub fn climate_sensor_mut(&mut self) -> &mut C {
        &mut self.climate
    }
}
