//! Sensor seams
//!
//! The register protocols of the individual chips live outside this crate.
//! The daemon only needs two capabilities:
//!
//! - a climate sensor (SHT4x class) giving temperature and relative humidity
//! - a metal-oxide gas sensor (SGP30 class) giving eCO2/TVOC estimates, with
//!   a humidity compensation input and a readable/restorable baseline
//!
//! ## Humidity Compensation
//!
//! MOx gas sensors respond to water vapour as well as to VOCs. Drivers take
//! absolute humidity (g/m³) as compensation input, derived from temperature
//! and relative humidity:
//!
//! ```text
//! AH = 216.7 * (RH/100 * 6.112 * exp(17.62*T / (243.12+T))) / (273.15 + T)
//! ```
//!
//! [`ClimateReading::absolute_humidity_g_m3`] does this conversion so every
//! driver computes it the same way.

use crate::errors::SensorError;
use crate::store::CalibrationBaseline;

/// Temperature and relative humidity from the climate sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Air temperature in °C
    pub temperature_c: f32,
    /// Relative humidity in %
    pub relative_humidity_pct: f32,
}

impl ClimateReading {
    /// Reading from temperature (°C) and relative humidity (%)
    pub fn new(temperature_c: f32, relative_humidity_pct: f32) -> Self {
        Self {
            temperature_c,
            relative_humidity_pct,
        }
    }

    /// Temperature in °F, for log output
    pub fn temperature_f(&self) -> f32 {
        self.temperature_c * 9.0 / 5.0 + 32.0
    }

    /// Absolute humidity in g/m³ (Magnus formula, Sensirion constants)
    pub fn absolute_humidity_g_m3(&self) -> f32 {
        let t = self.temperature_c as f64;
        let rh = self.relative_humidity_pct as f64;
        let saturation_hpa = 6.112 * libm::exp(17.62 * t / (243.12 + t));
        (216.7 * (rh / 100.0 * saturation_hpa) / (273.15 + t)) as f32
    }
}

/// Gas concentration estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasReading {
    /// Equivalent CO2 in ppm
    pub eco2_ppm: u16,
    /// Total volatile organic compounds in ppb
    pub tvoc_ppb: u16,
}

/// Source of temperature and humidity
pub trait ClimateSensor {
    /// Take one measurement
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError>;
}

/// Metal-oxide gas sensor with an adaptive internal baseline
pub trait GasSensor {
    /// Feed ambient conditions into the sensor's humidity compensation
    ///
    /// Must be called before [`GasSensor::measure`] in every cycle.
    fn set_humidity_compensation(&mut self, climate: &ClimateReading) -> Result<(), SensorError>;

    /// Take one air quality measurement
    fn measure(&mut self) -> Result<GasReading, SensorError>;

    /// Read back the current baseline counters
    fn baseline(&mut self) -> Result<CalibrationBaseline, SensorError>;

    /// Seed the sensor with a previously saved baseline
    fn restore_baseline(&mut self, baseline: &CalibrationBaseline) -> Result<(), SensorError>;
}
