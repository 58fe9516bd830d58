//! Process configuration from the environment
//!
//! | Variable                          | Required | Default                   |
//! |-----------------------------------|----------|---------------------------|
//! | `MQTT_CLIENT_ID`                  | yes      |                           |
//! | `MQTT_HOSTNAME`                   | yes      |                           |
//! | `MQTT_PORT`                       | yes      |                           |
//! | `MQTT_TOPIC`                      | yes      |                           |
//! | `MQTT_USERNAME` / `MQTT_PASSWORD` | no       | anonymous                 |
//! | `AIRGUARD_BASELINE_PATH`          | no       | `/opt/tvoc/baseline.dat`  |
//! | `AIRGUARD_PUBLISH_INTERVAL_SECS`  | no       | 60                        |
//! | `AIRGUARD_BASELINE_INTERVAL_SECS` | no       | 10                        |
//! | `AIRGUARD_WARMUP_SECS`            | no       | 43200                     |
//! | `AIRGUARD_SIMULATE`               | no       | false                     |
//!
//! Intervals are capped at one day and the warm-up at one week.
//!
//! Everything is read once at startup; a bad value stops the process before
//! any sensor is touched.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use airguard_connectors::MqttConfig;
use airguard_core::calibration::DEFAULT_WARM_UP;
use airguard_core::daemon::{DEFAULT_BASELINE_INTERVAL, DEFAULT_PUBLISH_INTERVAL};
use airguard_core::DaemonSettings;
use thiserror::Error;

/// Where the baseline checkpoint lives unless overridden
pub const DEFAULT_BASELINE_PATH: &str = "/opt/tvoc/baseline.dat";

/// Longest accepted publish or baseline interval (one day)
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Longest accepted warm-up (one week)
pub const MAX_WARM_UP_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("MQTT_USERNAME and MQTT_PASSWORD must be set together")]
    PartialCredentials,

    #[error("no hardware sensor backend in this build; set AIRGUARD_SIMULATE=1 to run on simulated sensors")]
    NoSensorBackend,
}

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub client_id: String,
    pub hostname: String,
    pub port: u16,
    pub topic: String,
    pub credentials: Option<(String, String)>,
}

/// Everything the daemon reads at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub broker: BrokerConfig,
    pub baseline_path: PathBuf,
    pub publish_interval: Duration,
    pub baseline_interval: Duration,
    pub warm_up: Duration,
    /// Run on synthetic sensors instead of hardware
    pub simulate: bool,
}

impl DaemonConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns `None` for unset names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port_raw = required("MQTT_PORT")?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| ConfigError::Invalid {
                name: "MQTT_PORT",
                value: port_raw.clone(),
                reason: "expected a port number between 1 and 65535",
            })?;

        let credentials = match (lookup("MQTT_USERNAME"), lookup("MQTT_PASSWORD")) {
            (Some(user), Some(pass)) => Some((user, pass)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        let broker = BrokerConfig {
            client_id: required("MQTT_CLIENT_ID")?,
            hostname: required("MQTT_HOSTNAME")?,
            port,
            topic: required("MQTT_TOPIC")?,
            credentials,
        };

        let baseline_path = lookup("AIRGUARD_BASELINE_PATH")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINE_PATH));

        Ok(Self {
            broker,
            baseline_path,
            publish_interval: seconds(
                &lookup,
                "AIRGUARD_PUBLISH_INTERVAL_SECS",
                DEFAULT_PUBLISH_INTERVAL,
                1..=MAX_INTERVAL_SECS,
            )?,
            baseline_interval: seconds(
                &lookup,
                "AIRGUARD_BASELINE_INTERVAL_SECS",
                DEFAULT_BASELINE_INTERVAL,
                1..=MAX_INTERVAL_SECS,
            )?,
            warm_up: seconds(
                &lookup,
                "AIRGUARD_WARMUP_SECS",
                DEFAULT_WARM_UP,
                0..=MAX_WARM_UP_SECS,
            )?,
            simulate: flag(&lookup, "AIRGUARD_SIMULATE")?,
        })
    }

    /// Timer and calibration settings for the tick
    pub fn settings(&self) -> DaemonSettings {
        DaemonSettings {
            publish_interval: self.publish_interval,
            baseline_interval: self.baseline_interval,
            warm_up: self.warm_up,
        }
    }

    /// MQTT client configuration
    pub fn mqtt(&self) -> MqttConfig {
        let broker = &self.broker;
        let config = MqttConfig::new(
            broker.client_id.as_str(),
            broker.hostname.as_str(),
            broker.port,
            broker.topic.as_str(),
        );
        match &broker.credentials {
            Some((user, pass)) => config.credentials(user.as_str(), pass.as_str()),
            None => config,
        }
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: Duration,
    range: RangeInclusive<u64>,
) -> Result<Duration, ConfigError> {
    let Some(raw) = lookup(name).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if range.contains(&secs) => Ok(Duration::from_secs(secs)),
        Ok(0) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "must be greater than zero",
        }),
        Ok(_) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "out of range",
        }),
        Err(_) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected whole seconds",
        }),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(name).filter(|v| !v.is_empty()) else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected a boolean (1/0, true/false)",
        }),
    }
}
