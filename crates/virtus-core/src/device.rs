// ── Device facade ──
//
// One owning context per configured device: gateway, coordinator, and
// every control surface, constructed together and torn down together.
// Nothing here is registered globally -- the embedding application holds
// the `Device` and drops it (after `shutdown`) when the device goes away.

use std::sync::Arc;

use virtus_api::{DiscoveredDevice, NodeInfo, VirtusClient};

use crate::config::DeviceConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::surface::{ClimateSurface, DefrostSensor, FlagSwitch, LastReportedSensor, SwingSelect};

/// A fully wired device: gateway, coordinator, and control surfaces.
pub struct Device {
    config: DeviceConfig,
    coordinator: Coordinator,
    climate: ClimateSurface,
    switches: Vec<FlagSwitch>,
    swing_selects: [SwingSelect; 2],
    defrost: DefrostSensor,
    last_reported: LastReportedSensor,
}

impl Device {
    /// Wire up a device from its configuration. No network traffic yet --
    /// call [`connect()`](Self::connect) to authenticate and start
    /// polling.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        let client = Arc::new(VirtusClient::new(
            config.client_config(),
            &config.transport_config(),
        )?);
        Ok(Self::with_client(config, client))
    }

    /// Wire up a device around an existing gateway client (shared
    /// transport session, or a test double pointing at a mock server).
    pub fn with_client(config: DeviceConfig, client: Arc<VirtusClient>) -> Self {
        let coordinator = Coordinator::new(client, config.poll_interval);
        let climate = ClimateSurface::new(coordinator.clone());
        let switches = FlagSwitch::all(&coordinator);
        let swing_selects = SwingSelect::all(&coordinator);
        let defrost = DefrostSensor::new(coordinator.clone());
        let last_reported = LastReportedSensor::new(coordinator.clone());

        Self {
            config,
            coordinator,
            climate,
            switches,
            swing_selects,
            defrost,
            last_reported,
        }
    }

    /// Authenticate, perform the first refresh, and start polling.
    ///
    /// Fails -- and leaves nothing running -- when authentication or the
    /// first refresh fails.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.coordinator
            .client()
            .authenticate()
            .await
            .map_err(CoreError::from)?;
        self.coordinator.start().await
    }

    /// Stop polling and abandon in-flight operations.
    pub fn shutdown(&self) {
        self.coordinator.shutdown();
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn climate(&self) -> &ClimateSurface {
        &self.climate
    }

    pub fn switches(&self) -> &[FlagSwitch] {
        &self.switches
    }

    pub fn swing_selects(&self) -> &[SwingSelect; 2] {
        &self.swing_selects
    }

    pub fn defrost(&self) -> &DefrostSensor {
        &self.defrost
    }

    pub fn last_reported(&self) -> &LastReportedSensor {
        &self.last_reported
    }

    // ── Gateway passthroughs ─────────────────────────────────────────

    /// Device metadata from the node-aggregation service.
    pub async fn node_info(&self) -> Result<NodeInfo, CoreError> {
        self.coordinator
            .client()
            .node_info()
            .await
            .map_err(CoreError::from)
    }

    /// The device's error report, passed through uninterpreted.
    pub async fn error_report(&self) -> Result<serde_json::Value, CoreError> {
        self.coordinator
            .client()
            .get_error()
            .await
            .map_err(CoreError::from)
    }

    /// Air-conditioner nodes in the configured home.
    pub async fn discover(&self) -> Result<Vec<DiscoveredDevice>, CoreError> {
        self.coordinator
            .client()
            .discover_devices()
            .await
            .map_err(CoreError::from)
    }
}
