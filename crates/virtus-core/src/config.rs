// ── Runtime device configuration ──
//
// Describes *which* device to shadow and how to reach it. Carries
// credential data and polling/transport tuning, but never touches disk --
// `virtus-config` (or the embedding application) constructs a
// `DeviceConfig` and hands it in. Immutable once a device is set up.

use std::time::Duration;

use secrecy::SecretString;

use virtus_api::{ClientConfig, TransportConfig};

/// Default interval between state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for shadowing a single air-conditioner node.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Enki account username.
    pub username: String,
    /// Enki account password.
    pub password: SecretString,
    /// Home the node belongs to.
    pub home_id: String,
    /// The node to shadow.
    pub node_id: String,
    /// Human-readable device label.
    pub device_name: String,
    /// Interval between state polls.
    pub poll_interval: Duration,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl DeviceConfig {
    pub fn new(
        username: impl Into<String>,
        password: SecretString,
        home_id: impl Into<String>,
        node_id: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password,
            home_id: home_id.into(),
            node_id: node_id.into(),
            device_name: device_name.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: TransportConfig::default().timeout,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Gateway connection parameters for this device. An empty node id
    /// (discovery-only setups) maps to "not configured".
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            username: Some(self.username.clone()),
            password: Some(self.password.clone()),
            home_id: (!self.home_id.is_empty()).then(|| self.home_id.clone()),
            node_id: (!self.node_id.is_empty()).then(|| self.node_id.clone()),
            ..ClientConfig::default()
        }
    }

    /// Transport tuning for this device.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }
}
