//! The daemon tick
//!
//! One call to [`Daemon::tick`] per second drives the whole node:
//!
//! 1. run a compensated reading cycle
//! 2. publish if the publish timer is due
//! 3. consult the calibration state machine if the baseline timer is due
//!
//! All mutable process state lives in [`DaemonState`]; each component owns
//! its own slice of it. The tick never exits the process itself. A
//! bootstrap exit comes back as [`TickControl::Terminate`] and the outer
//! driver decides what to do with it, which keeps the tick testable without
//! spawning processes.
//!
//! ```rust
//! use airguard_core::{Daemon, TickControl};
//! # use airguard_core::*;
//! # fn drive<C: ClimateSensor, G: GasSensor, S: BaselineStore, P: TelemetryPublisher>(
//! #     mut daemon: Daemon<C, G, S, P>, clock: &dyn TimeSource,
//! # ) -> Result<i32, DaemonError> {
//! loop {
//!     match daemon.tick(clock.now())? {
//!         TickControl::Continue => { /* sleep until the next second */ }
//!         TickControl::Terminate(reason) => return Ok(reason.exit_code()),
//!     }
//! }
//! # }
//! ```

use core::fmt;
use core::time::Duration;

use crate::calibration::{CalibrationOutcome, CalibrationStateMachine, DEFAULT_WARM_UP};
use crate::errors::DaemonError;
use crate::pipeline::{CompensatedReadingPipeline, Reading};
use crate::scheduler::ScheduleTimer;
use crate::sensors::{ClimateSensor, GasSensor};
use crate::store::BaselineStore;
use crate::telemetry::{TelemetryPayload, TelemetryPublisher};
use crate::time::Timestamp;

/// Default telemetry publish interval
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_secs(60);

/// Default baseline checkpoint interval
pub const DEFAULT_BASELINE_INTERVAL: Duration = Duration::from_secs(10);

/// Timer and calibration settings, fixed for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonSettings {
    /// How often telemetry is published
    pub publish_interval: Duration,
    /// How often the baseline timer fires
    pub baseline_interval: Duration,
    /// Warm-up deadline for a cold-started gas sensor
    pub warm_up: Duration,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            publish_interval: DEFAULT_PUBLISH_INTERVAL,
            baseline_interval: DEFAULT_BASELINE_INTERVAL,
            warm_up: DEFAULT_WARM_UP,
        }
    }
}

/// Why the daemon asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// First checkpoint of a cold start saved; restart to run calibrated
    BootstrapComplete,
}

impl ExitReason {
    /// Process exit status for this reason
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BootstrapComplete => 0,
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BootstrapComplete => f.write_str("initial calibration bootstrap complete"),
        }
    }
}

/// What the outer driver should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Sleep and tick again
    Continue,
    /// Stop the loop and exit
    Terminate(ExitReason),
}

/// All mutable process state
#[derive(Debug, Clone)]
pub struct DaemonState {
    started_at: Timestamp,
    publish_timer: ScheduleTimer,
    baseline_timer: ScheduleTimer,
    calibration: CalibrationStateMachine,
    last_reading: Option<Reading>,
    cycles: u64,
    publishes: u64,
}

impl DaemonState {
    /// Process start time
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Telemetry timer
    pub fn publish_timer(&self) -> &ScheduleTimer {
        &self.publish_timer
    }

    /// Baseline checkpoint timer
    pub fn baseline_timer(&self) -> &ScheduleTimer {
        &self.baseline_timer
    }

    /// Calibration lifecycle
    pub fn calibration(&self) -> &CalibrationStateMachine {
        &self.calibration
    }

    /// Reading from the most recent cycle
    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    /// Completed reading cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Payloads accepted by the publisher
    pub fn publishes(&self) -> u64 {
        self.publishes
    }
}

/// Sensors, store and publisher wired to the daemon state
pub struct Daemon<C, G, S, P> {
    state: DaemonState,
    pipeline: CompensatedReadingPipeline<C, G>,
    store: S,
    publisher: P,
}

impl<C, G, S, P> Daemon<C, G, S, P>
where
    C: ClimateSensor,
    G: GasSensor,
    S: BaselineStore,
    P: TelemetryPublisher,
{
    /// Initialise calibration (loading and restoring the checkpoint) and arm both timers
    pub fn start(
        settings: DaemonSettings,
        mut pipeline: CompensatedReadingPipeline<C, G>,
        store: S,
        publisher: P,
        started_at: Timestamp,
    ) -> Result<Self, DaemonError> {
        let calibration = CalibrationStateMachine::initialize(
            &store,
            pipeline.gas_sensor_mut(),
            started_at,
            settings.warm_up,
        )?;

        let state = DaemonState {
            started_at,
            publish_timer: ScheduleTimer::new("publish", settings.publish_interval, started_at),
            baseline_timer: ScheduleTimer::new("baseline", settings.baseline_interval, started_at),
            calibration,
            last_reading: None,
            cycles: 0,
            publishes: 0,
        };

        log::info!(
            "daemon started: publish every {}s, baseline every {}s, calibration {}",
            settings.publish_interval.as_secs(),
            settings.baseline_interval.as_secs(),
            state.calibration.state()
        );

        Ok(Self {
            state,
            pipeline,
            store,
            publisher,
        })
    }

    /// Run one tick at wall-clock time `now`
    pub fn tick(&mut self, now: Timestamp) -> Result<TickControl, DaemonError> {
        let reading = self.pipeline.read_cycle(now)?;
        self.state.cycles += 1;
        self.state.last_reading = Some(reading);

        if self.state.publish_timer.poll(now) {
            self.publish(&reading, now)?;
        }

        if self.state.baseline_timer.poll(now) {
            let outcome =
                self.state
                    .calibration
                    .on_baseline_tick(now, &reading.baseline, &mut self.store);

            log::info!(
                ">>> baseline values: TVOC = {:#x} ({}), eCO2 = {:#x} ({})",
                reading.baseline.tvoc,
                reading.baseline.tvoc,
                reading.baseline.eco2,
                reading.baseline.eco2
            );

            if outcome == CalibrationOutcome::BootstrapComplete {
                return Ok(TickControl::Terminate(ExitReason::BootstrapComplete));
            }
        }

        Ok(TickControl::Continue)
    }

    fn publish(&mut self, reading: &Reading, now: Timestamp) -> Result<(), DaemonError> {
        let payload = TelemetryPayload::from_reading(reading, self.state.started_at, now);

        log::info!(
            "TVOC: {} ppb | eCO2: {} ppm | T: {:.2} C ({:.2} F) | H: {:.2} % | baseline TVOC: {} | baseline eCO2: {}",
            payload.tvoc,
            payload.eco2,
            reading.temperature_c,
            reading.temperature_c * 9.0 / 5.0 + 32.0,
            reading.relative_humidity_pct,
            payload.baseline_tvoc,
            payload.baseline_eco2
        );

        match self.publisher.publish(&payload) {
            Ok(()) => {
                self.state.publishes += 1;
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("telemetry not published: {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Current process state
    pub fn state(&self) -> &DaemonState {
        &self.state
    }

    /// Baseline store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Baseline store, mutably
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Telemetry publisher
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Telemetry publisher, mutably
    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Reading pipeline
    pub fn pipeline_mut(&mut self) -> &mut CompensatedReadingPipeline<C, G> {
        &mut self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_deployment() {
        let settings = DaemonSettings::default();
        assert_eq!(settings.publish_interval, Duration::from_secs(60));
        assert_eq!(settings.baseline_interval, Duration::from_secs(10));
        assert_eq!(settings.warm_up, Duration::from_secs(43_200));
    }

    #[test]
    fn bootstrap_exit_is_success() {
        assert_eq!(ExitReason::BootstrapComplete.exit_code(), 0);
    }
}
