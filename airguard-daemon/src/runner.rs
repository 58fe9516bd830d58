//! Outer driver: ticks the daemon once per period until it stops

use std::time::Duration;

use airguard_core::{
    BaselineStore, ClimateSensor, Daemon, DaemonError, ExitReason, GasSensor, TelemetryPublisher,
    TickControl, TimeSource,
};
use tokio::time::{interval, MissedTickBehavior};

/// Production tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick `daemon` every `period`, reading wall-clock time from `clock`
///
/// Returns the reason the daemon asked to stop, or the first fatal error.
/// A tick that overruns delays the following ones rather than bunching them.
pub async fn run<C, G, S, P, T>(
    daemon: &mut Daemon<C, G, S, P>,
    clock: &T,
    period: Duration,
) -> Result<ExitReason, DaemonError>
where
    C: ClimateSensor,
    G: GasSensor,
    S: BaselineStore,
    P: TelemetryPublisher,
    T: TimeSource + ?Sized,
{
    if !clock.is_wall_clock() {
        log::warn!("clock is not wall-clock time, timer alignment will not survive restarts");
    }

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let TickControl::Terminate(reason) = daemon.tick(clock.now())? {
            log::info!("{}, exiting", reason);
            return Ok(reason);
        }
    }
}

/// Process exit status for the outcome of [`run`]
pub fn exit_code(outcome: &Result<ExitReason, DaemonError>) -> u8 {
    match outcome {
        Ok(reason) => reason.exit_code() as u8,
        Err(DaemonError::Sensor(_)) => 1,
        Err(DaemonError::Publish(_)) => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimulatedClimate, SimulatedGas};
    use airguard_core::{
        CompensatedReadingPipeline, DaemonSettings, MemoryBaselineStore, PublishError,
        SensorError, TelemetryPayload, Timestamp,
    };
    use std::cell::Cell;

    /// Clock that moves one simulated second per reading
    struct SteppingClock(Cell<Timestamp>);

    impl TimeSource for SteppingClock {
        fn now(&self) -> Timestamp {
            let now = self.0.get();
            self.0.set(now + 1_000);
            now
        }

        fn is_wall_clock(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct Collect {
        payloads: Vec<TelemetryPayload>,
        closed: bool,
    }

    impl TelemetryPublisher for Collect {
        fn publish(&mut self, payload: &TelemetryPayload) -> Result<(), PublishError> {
            if self.closed {
                return Err(PublishError::Closed);
            }
            self.payloads.push(*payload);
            Ok(())
        }
    }

    const START: Timestamp = 1_700_000_040_001;

    fn daemon(
        warm_up: Duration,
        publisher: Collect,
    ) -> Daemon<SimulatedClimate, SimulatedGas, MemoryBaselineStore, Collect> {
        Daemon::start(
            DaemonSettings {
                warm_up,
                ..DaemonSettings::default()
            },
            CompensatedReadingPipeline::new(SimulatedClimate::new(), SimulatedGas::new()),
            MemoryBaselineStore::new(),
            publisher,
            START,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn bootstrap_ends_the_run_successfully() {
        let mut daemon = daemon(Duration::ZERO, Collect::default());
        let clock = SteppingClock(Cell::new(START));

        let outcome = run(&mut daemon, &clock, Duration::from_millis(1)).await;

        assert_eq!(outcome, Ok(ExitReason::BootstrapComplete));
        assert_eq!(exit_code(&outcome), 0);
        assert_eq!(daemon.state().cycles(), 11);
        assert_eq!(daemon.store().saves(), 1);
        // First publish boundary is a minute away
        assert!(daemon.publisher().payloads.is_empty());
    }

    #[tokio::test]
    async fn fatal_publish_error_ends_the_run() {
        let publisher = Collect {
            closed: true,
            ..Collect::default()
        };
        let mut daemon = daemon(Duration::from_secs(3_600), publisher);
        let clock = SteppingClock(Cell::new(START));

        let outcome = run(&mut daemon, &clock, Duration::from_millis(1)).await;

        assert_eq!(outcome, Err(DaemonError::Publish(PublishError::Closed)));
        assert_eq!(exit_code(&outcome), 2);
    }

    #[test]
    fn sensor_failure_exit_code() {
        let err = DaemonError::Sensor(SensorError::ReadFailed {
            sensor: "SHT4x",
            operation: "measure",
            details: "NACK",
        });
        assert_eq!(exit_code(&Err(err)), 1);
    }
}
