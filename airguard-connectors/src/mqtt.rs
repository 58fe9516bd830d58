//! MQTT connector for AirGuard
//!
//! Wraps a rumqttc `AsyncClient`. The client's event loop is driven by its
//! own tokio task, which also owns reconnecting: when the broker goes away
//! the task logs it, waits [`RECONNECT_DELAY`], and polls again (rumqttc
//! reconnects on the next poll). Publishing only pushes onto the client's
//! request queue and returns immediately.
//!
//! Telemetry is published with QoS 1 and the retain flag set, so a
//! dashboard that subscribes late still gets the node's last reading.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use airguard_core::{PublishError, TelemetryPayload, TelemetryPublisher};
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::{ConnectionStats, Connector, ConnectorError};

/// Wait between failed event loop polls
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// MQTT client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MqttConfig {
    /// Client identifier presented to the broker
    pub client_id: String,
    /// Broker host name or address
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Topic telemetry is published on
    pub topic: String,
    /// Optional username/password
    pub credentials: Option<(String, String)>,
    /// MQTT keep-alive
    pub keep_alive: Duration,
    /// Requests the client queues before `try_publish` reports backpressure
    pub queue_capacity: usize,
}

impl MqttConfig {
    /// Configuration with default keep-alive (30s) and queue capacity (16)
    pub fn new(
        client_id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            host: host.into(),
            port,
            topic: topic.into(),
            credentials: None,
            keep_alive: Duration::from_secs(30),
            queue_capacity: 16,
        }
    }

    /// Set username/password authentication
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Set keep-alive in seconds
    pub fn keep_alive_secs(mut self, secs: u64) -> Self {
        self.keep_alive = Duration::from_secs(secs);
        self
    }

    /// Check the fields rumqttc would otherwise reject by panicking
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.client_id.is_empty() {
            return Err(ConnectorError::ConfigError("client id is empty".into()));
        }
        if self.topic.is_empty() || self.topic.contains(['+', '#']) {
            return Err(ConnectorError::ConfigError(format!(
                "invalid publish topic {:?}",
                self.topic
            )));
        }
        if self.keep_alive < Duration::from_secs(5) {
            return Err(ConnectorError::ConfigError(
                "keep-alive must be at least 5 seconds".into(),
            ));
        }
        Ok(())
    }

    /// rumqttc options for this configuration
    pub fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        if let Some((username, password)) = &self.credentials {
            options.set_credentials(username, password);
        }
        options
    }
}

/// State shared between the connector and its event loop task
#[derive(Debug, Default)]
struct Shared {
    connected: AtomicBool,
    closed: AtomicBool,
    stats: Mutex<ConnectionStats>,
}

impl Shared {
    fn with_stats(&self, f: impl FnOnce(&mut ConnectionStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }
}

/// MQTT publisher with a background event loop
pub struct MqttConnector {
    client: AsyncClient,
    topic: String,
    shared: Arc<Shared>,
}

impl MqttConnector {
    /// Create the client and spawn its event loop on the current tokio runtime
    ///
    /// # Panics
    ///
    /// When called outside a tokio runtime.
    pub fn spawn(config: MqttConfig) -> Self {
        let (client, eventloop) = AsyncClient::new(config.options(), config.queue_capacity);
        let shared = Arc::new(Shared::default());

        log::info!(
            "MQTT client {} -> {}:{}, topic {}",
            config.client_id,
            config.host,
            config.port,
            config.topic
        );
        // Guard is moved into the future so it fires even if the task never runs
        let guard = ClosedOnDrop(Arc::clone(&shared));
        tokio::spawn(drive_event_loop(eventloop, guard));

        Self {
            client,
            topic: config.topic,
            shared,
        }
    }

    /// Topic telemetry goes to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Snapshot of connection statistics
    pub fn stats(&self) -> ConnectionStats {
        self.shared
            .stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn enqueue(&self, topic: &str, data: &[u8]) -> Result<(), ConnectorError> {
        match self
            .client
            .try_publish(topic, QoS::AtLeastOnce, true, data.to_vec())
        {
            Ok(()) => {
                self.shared.with_stats(|s| s.record_sent(data.len()));
                Ok(())
            }
            Err(e) => {
                self.shared.with_stats(|s| s.record_failed(&e));
                if self.shared.closed.load(Ordering::Acquire) {
                    Err(ConnectorError::Closed)
                } else {
                    Err(ConnectorError::BufferFull)
                }
            }
        }
    }
}

/// Marks the transport closed when the event loop task ends, including by cancellation
struct ClosedOnDrop(Arc<Shared>);

impl Drop for ClosedOnDrop {
    fn drop(&mut self) {
        self.0.connected.store(false, Ordering::Release);
        self.0.closed.store(true, Ordering::Release);
    }
}

async fn drive_event_loop(mut eventloop: EventLoop, guard: ClosedOnDrop) {
    let shared = &guard.0;

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                shared.connected.store(true, Ordering::Release);
                log::info!("MQTT connected ({:?})", ack.code);
            }
            Ok(_) => {}
            Err(ConnectionError::RequestsDone) => {
                log::debug!("MQTT client dropped, event loop exiting");
                break;
            }
            Err(e) => {
                if shared.connected.swap(false, Ordering::AcqRel) {
                    log::warn!("MQTT connection lost: {}", e);
                } else {
                    log::warn!("MQTT connection failed: {}", e);
                }
                shared.with_stats(|s| {
                    s.reconnections += 1;
                    s.last_error = Some(e.to_string());
                });
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

impl Connector for MqttConnector {
    type Error = ConnectorError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        self.enqueue(topic, data)
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }
}

/// JSON body for one telemetry payload
pub fn encode_payload(payload: &TelemetryPayload) -> Result<Vec<u8>, PublishError> {
    serde_json::to_vec(payload).map_err(|e| PublishError::Encode(e.to_string()))
}

impl TelemetryPublisher for MqttConnector {
    fn publish(&mut self, payload: &TelemetryPayload) -> Result<(), PublishError> {
        let body = encode_payload(payload)?;
        let topic = self.topic.clone();

        match self.send(&topic, &body) {
            Ok(()) => {
                log::info!(
                    "MQTT publish {}: {}",
                    topic,
                    String::from_utf8_lossy(&body)
                );
                Ok(())
            }
            Err(ConnectorError::Closed) => Err(PublishError::Closed),
            Err(_) => Err(PublishError::Backpressure),
        }
    }
}
