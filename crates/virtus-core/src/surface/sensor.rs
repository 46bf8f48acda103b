// Read-only sensor views: no commands, no overlay.

use chrono::{DateTime, Utc};

use crate::convert;
use crate::coordinator::Coordinator;

/// Defrost indicator. Reported by the device, never settable.
pub struct DefrostSensor {
    coordinator: Coordinator,
}

impl DefrostSensor {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// `None` until the first successful poll.
    pub fn is_on(&self) -> Option<bool> {
        self.coordinator.current().map(|state| state.defrost_mode)
    }
}

/// When the device itself last reported state to the cloud -- the
/// authoritative freshness marker, distinct from our poll clock.
pub struct LastReportedSensor {
    coordinator: Coordinator,
}

impl LastReportedSensor {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// `None` when no snapshot is held or the marker does not parse.
    pub fn value(&self) -> Option<DateTime<Utc>> {
        self.coordinator
            .current()
            .and_then(|state| convert::last_reported(&state))
    }
}
