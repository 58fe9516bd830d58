//! `airguard`: air-quality telemetry daemon
//!
//! Samples temperature, humidity, eCO2 and TVOC once per second, publishes
//! retained telemetry over MQTT and checkpoints the gas sensor baseline.
//! Exits 0 after the first baseline checkpoint of a cold start so a
//! supervisor restarts it calibrated.
//!
//! This build carries no hardware sensor drivers: it refuses to start unless
//! `AIRGUARD_SIMULATE=1` selects the simulated sensors.

use std::process::ExitCode;

use anyhow::{Context, Result};

use airguard_connectors::MqttConnector;
use airguard_core::time::SystemTime;
use airguard_core::{CompensatedReadingPipeline, Daemon, FileBaselineStore, TimeSource};
use airguard_daemon::sim::simulated_sensors;
use airguard_daemon::{exit_code, run, DaemonConfig, TICK_PERIOD};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match serve() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn serve() -> Result<u8> {
    let config = DaemonConfig::from_env().context("reading configuration")?;
    let mqtt = config.mqtt();
    mqtt.validate().context("MQTT configuration")?;

    log::info!(
        "airguard {} starting: broker {}:{}, topic {}, baseline file {}",
        airguard_core::VERSION,
        config.broker.hostname,
        config.broker.port,
        config.broker.topic,
        config.baseline_path.display()
    );

    let (climate, gas) = simulated_sensors(&config).context("selecting sensors")?;

    let clock = SystemTime;
    let publisher = MqttConnector::spawn(mqtt);
    let store = FileBaselineStore::new(&config.baseline_path);
    let pipeline = CompensatedReadingPipeline::new(climate, gas);

    let mut daemon = Daemon::start(config.settings(), pipeline, store, publisher, clock.now())
        .context("initialising calibration")?;

    let outcome = run(&mut daemon, &clock, TICK_PERIOD).await;
    if let Err(e) = &outcome {
        log::error!("daemon stopped: {}", e);
    }

    Ok(exit_code(&outcome))
}
