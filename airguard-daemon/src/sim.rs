//! Simulated sensors
//!
//! Synthetic climate and gas readings that vary over time, so the daemon can
//! run end to end on a workstation with no I2C bus attached. Each `read`
//! advances an internal one-second clock.
//!
//! Opt-in only: [`simulated_sensors`] refuses unless `AIRGUARD_SIMULATE` is
//! set, so a node never publishes synthetic values by accident.

use airguard_core::{
    CalibrationBaseline, ClimateReading, ClimateSensor, GasReading, GasSensor, SensorError,
};

use crate::config::{ConfigError, DaemonConfig};

/// Simulated sensor pair, if the configuration asked for it
pub fn simulated_sensors(
    config: &DaemonConfig,
) -> Result<(SimulatedClimate, SimulatedGas), ConfigError> {
    if !config.simulate {
        return Err(ConfigError::NoSensorBackend);
    }

    log::warn!(
        "AIRGUARD_SIMULATE is set: publishing SYNTHETIC readings to {} and checkpointing a synthetic baseline to {}",
        config.broker.topic,
        config.baseline_path.display()
    );
    Ok((SimulatedClimate::new(), SimulatedGas::new()))
}

/// Seconds of simulated time per reading
const SAMPLE_PERIOD_SECS: f64 = 1.0;

/// Temperature and humidity following slow sinusoids
#[derive(Debug, Default)]
pub struct SimulatedClimate {
    elapsed_secs: f64,
}

impl SimulatedClimate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClimateSensor for SimulatedClimate {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.elapsed_secs += SAMPLE_PERIOD_SECS;
        let t = self.elapsed_secs;

        // 20–26 °C with slow drift
        let temperature = 23.0 + 3.0 * (t / 120.0).sin() + 0.5 * (t / 37.0).cos();
        // 40–60 % on a different period
        let humidity = 50.0 + 10.0 * (t / 180.0).sin() + 2.0 * (t / 23.0).cos();

        Ok(ClimateReading::new(temperature as f32, humidity as f32))
    }
}

/// Gas sensor with a drifting baseline
///
/// Measurements refuse to run before humidity compensation has been written
/// once, like a sensor that was never initialised.
#[derive(Debug)]
pub struct SimulatedGas {
    elapsed_secs: f64,
    baseline: CalibrationBaseline,
    compensation: Option<ClimateReading>,
}

impl SimulatedGas {
    /// Factory-fresh sensor
    pub fn new() -> Self {
        Self {
            elapsed_secs: 0.0,
            baseline: CalibrationBaseline::new(0x8973, 0x8aae),
            compensation: None,
        }
    }

    /// Baseline the sensor currently holds
    pub fn current_baseline(&self) -> CalibrationBaseline {
        self.baseline
    }
}

impl Default for SimulatedGas {
    fn default() -> Self {
        Self::new()
    }
}

impl GasSensor for SimulatedGas {
    fn set_humidity_compensation(&mut self, climate: &ClimateReading) -> Result<(), SensorError> {
        self.compensation = Some(*climate);
        Ok(())
    }

    fn measure(&mut self) -> Result<GasReading, SensorError> {
        let Some(climate) = self.compensation else {
            return Err(SensorError::ReadFailed {
                sensor: "simulated gas",
                operation: "measure air quality",
                details: "humidity compensation not set",
            });
        };

        self.elapsed_secs += SAMPLE_PERIOD_SECS;
        let t = self.elapsed_secs;

        // Damp air reads slightly higher, as an uncompensated sensor would drift
        let humidity_bias = f64::from(climate.absolute_humidity_g_m3()) * 2.0;
        let eco2 = 600.0 + 200.0 * (t / 300.0).sin() + 30.0 * (t / 41.0).cos() + humidity_bias;
        let tvoc = 60.0 + 50.0 * (t / 240.0).sin() + 10.0 * (t / 17.0).cos();

        // Baseline counters creep by one every ten minutes
        if (self.elapsed_secs as u64) % 600 == 0 {
            self.baseline = CalibrationBaseline::new(
                self.baseline.eco2.wrapping_add(1),
                self.baseline.tvoc.wrapping_add(1),
            );
        }

        Ok(GasReading {
            eco2_ppm: eco2.max(400.0) as u16,
            tvoc_ppb: tvoc.max(0.0) as u16,
        })
    }

    fn baseline(&mut self) -> Result<CalibrationBaseline, SensorError> {
        Ok(self.baseline)
    }

    fn restore_baseline(&mut self, baseline: &CalibrationBaseline) -> Result<(), SensorError> {
        log::debug!("simulated gas sensor baseline set to {}", baseline);
        self.baseline = *baseline;
        Ok(())
    }
}
