// Per-axis swing selects.
//
// Unlike the combined swing mode on the climate surface, these expose
// each louver axis as an independent discrete position. Writing one axis
// leaves the caller's intent for the other axis unspecified -- the
// gateway fills it with AUTO on the wire, which is what the vendor app
// does too.

use std::sync::Mutex;

use tokio::sync::watch;

use virtus_api::StateChange;

use crate::convert;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::{SwingAxis, SwingPosition};
use crate::surface::{ChangeSignal, submit};

/// Discrete position control for one louver axis.
pub struct SwingSelect {
    coordinator: Coordinator,
    axis: SwingAxis,
    overlay: Mutex<Option<SwingPosition>>,
    changes: ChangeSignal,
}

impl SwingSelect {
    pub fn new(coordinator: Coordinator, axis: SwingAxis) -> Self {
        Self {
            coordinator,
            axis,
            overlay: Mutex::new(None),
            changes: ChangeSignal::new(),
        }
    }

    /// Both axis selects for one device.
    pub fn all(coordinator: &Coordinator) -> [Self; 2] {
        [
            Self::new(coordinator.clone(), SwingAxis::Vertical),
            Self::new(coordinator.clone(), SwingAxis::Horizontal),
        ]
    }

    pub fn axis(&self) -> SwingAxis {
        self.axis
    }

    /// The positions selectable on this axis.
    pub fn options(&self) -> &'static [SwingPosition] {
        self.axis.options()
    }

    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Rendered position: overlay first, then the snapshot (unknown
    /// vendor values degrade to `Auto`); `None` before the first poll.
    pub fn current(&self) -> Option<SwingPosition> {
        if let Some(position) = *self.overlay.lock().expect("overlay lock poisoned") {
            return Some(position);
        }
        self.coordinator
            .current()
            .map(|state| convert::swing_position(&state, self.axis))
    }

    /// Move this axis to `position`.
    pub async fn select(&self, position: SwingPosition) -> Result<(), CoreError> {
        if !self.options().contains(&position) {
            return Err(CoreError::InvalidValue {
                message: format!("{position} is not available on the {} axis", self.axis),
            });
        }

        *self.overlay.lock().expect("overlay lock poisoned") = Some(position);
        self.changes.bump();

        let wire = position.to_wire().to_owned();
        let change = match self.axis {
            SwingAxis::Horizontal => StateChange {
                swing_horizontal: Some(wire),
                ..StateChange::default()
            },
            SwingAxis::Vertical => StateChange {
                swing_vertical: Some(wire),
                ..StateChange::default()
            },
        };
        let write = submit(&self.coordinator, change).await;

        *self.overlay.lock().expect("overlay lock poisoned") = None;
        self.changes.bump();
        write.map_err(CoreError::from)
    }
}
