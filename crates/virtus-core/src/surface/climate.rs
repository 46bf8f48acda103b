// Climate surface: the main thermostat-like view of the device.
//
// Mode, target temperature, fan speed, and the combined swing mode each
// keep their own optimistic overlay entry so a command is reflected
// immediately and reconciled by the refresh that follows it.

use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::watch;

use virtus_api::{AcState, StateChange};

use crate::convert;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::{FanMode, HvacMode, Power, SwingMode, SwingPosition};
use crate::surface::{ChangeSignal, submit};

/// Optimistic values shown between a command and the refresh that
/// confirms or corrects it. Never a source of truth: cleared
/// unconditionally when the command's refresh completes.
#[derive(Debug, Default)]
struct ClimateOverlay {
    hvac_mode: Option<HvacMode>,
    target_temperature: Option<f64>,
    fan_mode: Option<FanMode>,
    swing_mode: Option<SwingMode>,
}

/// Thermostat-style control surface over one device.
pub struct ClimateSurface {
    coordinator: Coordinator,
    overlay: Mutex<ClimateOverlay>,
    changes: ChangeSignal,
}

impl ClimateSurface {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator,
            overlay: Mutex::new(ClimateOverlay::default()),
            changes: ChangeSignal::new(),
        }
    }

    /// Observe overlay changes (the snapshot channel covers the rest).
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn snapshot(&self) -> Option<Arc<AcState>> {
        self.coordinator.current()
    }

    fn with_overlay<T>(&self, f: impl FnOnce(&mut ClimateOverlay) -> T) -> T {
        let mut overlay = self.overlay.lock().expect("overlay lock poisoned");
        f(&mut overlay)
    }

    fn clear_overlay(&self) {
        self.with_overlay(|o| *o = ClimateOverlay::default());
        self.changes.bump();
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Current climate mode. Off both when the device reports power OFF
    /// and when no snapshot is available yet.
    pub fn hvac_mode(&self) -> HvacMode {
        if let Some(mode) = self.with_overlay(|o| o.hvac_mode) {
            return mode;
        }
        self.snapshot()
            .map_or(HvacMode::Off, |state| convert::hvac_mode(&state))
    }

    /// Room temperature as reported by the device. Read-only.
    pub fn current_temperature(&self) -> Option<f64> {
        self.snapshot().map(|state| state.current_temperature)
    }

    pub fn target_temperature(&self) -> Option<f64> {
        if let Some(temp) = self.with_overlay(|o| o.target_temperature) {
            return Some(temp);
        }
        self.snapshot().map(|state| state.target_temperature)
    }

    pub fn fan_mode(&self) -> Option<FanMode> {
        if let Some(mode) = self.with_overlay(|o| o.fan_mode) {
            return Some(mode);
        }
        self.snapshot().map(|state| convert::fan_mode(&state))
    }

    pub fn swing_mode(&self) -> Option<SwingMode> {
        if let Some(mode) = self.with_overlay(|o| o.swing_mode) {
            return Some(mode);
        }
        self.snapshot().map(|state| convert::swing_mode(&state))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch the climate mode. `Off` only touches power; other modes
    /// power the device on and select the vendor operating mode.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), CoreError> {
        self.with_overlay(|o| o.hvac_mode = Some(mode));
        self.changes.bump();

        let change = match mode.to_wire() {
            None => StateChange {
                power: Some(Power::Off.to_wire().to_owned()),
                ..StateChange::default()
            },
            Some(wire_mode) => StateChange {
                power: Some(Power::On.to_wire().to_owned()),
                operating_mode: Some(wire_mode.to_owned()),
                ..StateChange::default()
            },
        };
        self.command(change).await
    }

    pub async fn set_target_temperature(&self, temperature: f64) -> Result<(), CoreError> {
        self.with_overlay(|o| o.target_temperature = Some(temperature));
        self.changes.bump();

        let change = StateChange {
            target_temperature: Some(temperature),
            ..StateChange::default()
        };
        self.command(change).await
    }

    pub async fn set_fan_mode(&self, mode: FanMode) -> Result<(), CoreError> {
        self.with_overlay(|o| o.fan_mode = Some(mode));
        self.changes.bump();

        let change = StateChange {
            fan_speed: Some(mode.to_wire().to_owned()),
            ..StateChange::default()
        };
        self.command(change).await
    }

    /// Set the combined swing mode.
    ///
    /// "off" parks both louvers on the lowest fixed level; the single-axis
    /// modes start that axis sweeping and leave the other axis alone.
    pub async fn set_swing_mode(&self, mode: SwingMode) -> Result<(), CoreError> {
        self.with_overlay(|o| o.swing_mode = Some(mode));
        self.changes.bump();

        let lowest = SwingPosition::Level1.to_wire().to_owned();
        let auto = SwingPosition::Auto.to_wire().to_owned();
        let (horizontal, vertical) = match mode {
            SwingMode::Off => (Some(lowest.clone()), Some(lowest)),
            SwingMode::Vertical => (None, Some(auto)),
            SwingMode::Horizontal => (Some(auto), None),
            SwingMode::Both => (Some(auto.clone()), Some(auto)),
        };
        let change = StateChange {
            swing_horizontal: horizontal,
            swing_vertical: vertical,
            ..StateChange::default()
        };
        self.command(change).await
    }

    /// Power on, optimistically showing the last known operating mode.
    pub async fn turn_on(&self) -> Result<(), CoreError> {
        let last_mode = self
            .snapshot()
            .map_or(HvacMode::Auto, |state| {
                convert::operating_mode(&state.operating_mode)
            });
        self.with_overlay(|o| o.hvac_mode = Some(last_mode));
        self.changes.bump();

        let change = StateChange {
            power: Some(Power::On.to_wire().to_owned()),
            ..StateChange::default()
        };
        self.command(change).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.with_overlay(|o| o.hvac_mode = Some(HvacMode::Off));
        self.changes.bump();

        let change = StateChange {
            power: Some(Power::Off.to_wire().to_owned()),
            ..StateChange::default()
        };
        self.command(change).await
    }

    /// Shared command tail; the overlay is cleared whatever the write
    /// and refresh came to.
    async fn command(&self, change: StateChange) -> Result<(), CoreError> {
        let write = submit(&self.coordinator, change).await;
        self.clear_overlay();
        write.map_err(CoreError::from)
    }
}
