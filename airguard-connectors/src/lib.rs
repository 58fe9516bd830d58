//! Telemetry Transport Connectors
//!
//! ## Overview
//!
//! The daemon hands each reading to a connector and moves on. Connection
//! management, reconnects and delivery guarantees live here (and in the
//! protocol library underneath), never in the daemon's tick.
//!
//! ### MQTT
//!
//! The only transport an AirGuard node ships with:
//! - Pub/sub, many consumers per sensor node
//! - Retained messages so new subscribers see the last reading immediately
//! - The client's event loop runs on its own tokio task; publishing only
//!   enqueues, it never waits for the network
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use airguard_connectors::mqtt::{MqttConfig, MqttConnector};
//!
//! # async fn example() {
//! let config = MqttConfig::new("airguard-livingroom", "broker.local", 1883, "home/air/livingroom")
//!     .credentials("sensor", "secret");
//!
//! // Must be called from inside a tokio runtime
//! let connector = MqttConnector::spawn(config);
//! # }
//! ```

#[cfg(feature = "mqtt")]
pub mod mqtt;

// Re-export common types
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttConnector};

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Transport closed")]
    Closed,

    #[error("Buffer full")]
    BufferFull,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Trait for all protocol connectors
pub trait Connector {
    type Error;

    /// Queue raw bytes for `topic` without waiting on the network
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages handed to the transport
    pub messages_sent: u64,
    /// Total messages the transport refused
    pub messages_failed: u64,
    /// Total payload bytes handed to the transport
    pub bytes_sent: u64,
    /// Number of connection failures followed by a reconnect attempt
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub(crate) fn record_failed(&mut self, error: impl ToString) {
        self.messages_failed += 1;
        self.last_error = Some(error.to_string());
    }
}
