//! Common test doubles for integration tests
//!
//! This module provides:
//! - Scripted climate and gas sensors that record what the daemon did to them
//! - A recording telemetry publisher with switchable failure modes
//! - A daemon builder wired to an in-memory baseline store

#![allow(dead_code)]

use std::time::Duration;

use airguard_core::{
    ClimateReading, ClimateSensor, CompensatedReadingPipeline, Daemon, DaemonSettings,
    GasReading, GasSensor, MemoryBaselineStore, PublishError, SensorError, TelemetryPayload,
    TelemetryPublisher, Timestamp,
    store::CalibrationBaseline,
};

/// A whole minute since the epoch, so every timer boundary lines up with it
pub const T0: Timestamp = 1_700_000_040_000;

pub const BUS_FAULT: SensorError = SensorError::ReadFailed {
    sensor: "SHT4x",
    operation: "measure temperature/humidity",
    details: "I2C communication error",
};

/// Climate sensor returning a fixed reading, optionally failing from a given call on
pub struct ScriptedClimate {
    pub reading: ClimateReading,
    pub fail_after: Option<usize>,
    pub calls: usize,
}

impl ScriptedClimate {
    pub fn new(temperature_c: f32, relative_humidity_pct: f32) -> Self {
        Self {
            reading: ClimateReading::new(temperature_c, relative_humidity_pct),
            fail_after: None,
            calls: 0,
        }
    }
}

impl ClimateSensor for ScriptedClimate {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.calls += 1;
        match self.fail_after {
            Some(n) if self.calls > n => Err(BUS_FAULT),
            _ => Ok(self.reading),
        }
    }
}

/// Gas sensor with a fixed measurement and a settable baseline
pub struct ScriptedGas {
    pub reading: GasReading,
    pub baseline: CalibrationBaseline,
    pub restored: Option<CalibrationBaseline>,
    pub compensation: Option<ClimateReading>,
    /// Measurements taken before any compensation was written
    pub uncompensated_measures: usize,
    pub measures: usize,
}

impl ScriptedGas {
    pub fn new(eco2_ppm: u16, tvoc_ppb: u16) -> Self {
        Self {
            reading: GasReading { eco2_ppm, tvoc_ppb },
            baseline: CalibrationBaseline::new(35187, 36821),
            restored: None,
            compensation: None,
            uncompensated_measures: 0,
            measures: 0,
        }
    }
}

impl GasSensor for ScriptedGas {
    fn set_humidity_compensation(&mut self, climate: &ClimateReading) -> Result<(), SensorError> {
        self.compensation = Some(*climate);
        Ok(())
    }

    fn measure(&mut self) -> Result<GasReading, SensorError> {
        if self.compensation.is_none() {
            self.uncompensated_measures += 1;
        }
        self.measures += 1;
        Ok(self.reading)
    }

    fn baseline(&mut self) -> Result<CalibrationBaseline, SensorError> {
        Ok(self.baseline)
    }

    fn restore_baseline(&mut self, baseline: &CalibrationBaseline) -> Result<(), SensorError> {
        // Restoring happens before the first measurement or not at all
        assert_eq!(self.measures, 0, "baseline restored after measuring");
        self.restored = Some(*baseline);
        self.baseline = *baseline;
        Ok(())
    }
}

/// Publisher that keeps every payload it accepts
#[derive(Default)]
pub struct RecordingPublisher {
    pub payloads: Vec<TelemetryPayload>,
    pub fail_with: Option<PublishError>,
    pub rejected: usize,
}

impl TelemetryPublisher for RecordingPublisher {
    fn publish(&mut self, payload: &TelemetryPayload) -> Result<(), PublishError> {
        if let Some(e) = &self.fail_with {
            self.rejected += 1;
            return Err(e.clone());
        }
        self.payloads.push(*payload);
        Ok(())
    }
}

pub type TestDaemon = Daemon<ScriptedClimate, ScriptedGas, MemoryBaselineStore, RecordingPublisher>;

/// Daemon over default scripted sensors (25°C, 40%, eCO2 450, TVOC 15)
pub fn daemon(store: MemoryBaselineStore, warm_up: Duration, started_at: Timestamp) -> TestDaemon {
    daemon_with(
        ScriptedClimate::new(25.0, 40.0),
        ScriptedGas::new(450, 15),
        store,
        DaemonSettings {
            warm_up,
            ..DaemonSettings::default()
        },
        started_at,
    )
}

pub fn daemon_with(
    climate: ScriptedClimate,
    gas: ScriptedGas,
    store: MemoryBaselineStore,
    settings: DaemonSettings,
    started_at: Timestamp,
) -> TestDaemon {
    Daemon::start(
        settings,
        CompensatedReadingPipeline::new(climate, gas),
        store,
        RecordingPublisher::default(),
        started_at,
    )
    .expect("scripted sensors never fail at startup")
}
