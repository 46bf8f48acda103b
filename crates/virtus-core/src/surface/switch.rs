// Flag switches: the five writable boolean modes.
//
// One descriptor per flag -- capability key, read derivation, write
// mapping -- and a single engine iterating the table instead of one
// hand-written type per flag. Defrost is deliberately absent here: it is
// report-only and lives in `sensor`.

use std::sync::Mutex;

use strum::{Display, EnumIter, EnumString};
use tokio::sync::watch;

use virtus_api::{AcState, StateChange};

use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::surface::{ChangeSignal, submit};

/// The writable boolean modes the device exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FlagKind {
    QuietMode,
    SleepMode,
    HealthMode,
    FrostProtectionMode,
    SelfCleanMode,
}

struct FlagDescriptor {
    kind: FlagKind,
    read: fn(&AcState) -> bool,
    write: fn(bool) -> StateChange,
}

const FLAGS: &[FlagDescriptor] = &[
    FlagDescriptor {
        kind: FlagKind::QuietMode,
        read: |state| state.quiet_mode,
        write: |value| StateChange {
            quiet_mode: Some(value),
            ..StateChange::default()
        },
    },
    FlagDescriptor {
        kind: FlagKind::SleepMode,
        read: |state| state.sleep_mode,
        write: |value| StateChange {
            sleep_mode: Some(value),
            ..StateChange::default()
        },
    },
    FlagDescriptor {
        kind: FlagKind::HealthMode,
        read: |state| state.health_mode,
        write: |value| StateChange {
            health_mode: Some(value),
            ..StateChange::default()
        },
    },
    FlagDescriptor {
        kind: FlagKind::FrostProtectionMode,
        read: |state| state.frost_protection_mode,
        write: |value| StateChange {
            frost_protection_mode: Some(value),
            ..StateChange::default()
        },
    },
    FlagDescriptor {
        kind: FlagKind::SelfCleanMode,
        read: |state| state.self_clean_mode,
        write: |value| StateChange {
            self_clean_mode: Some(value),
            ..StateChange::default()
        },
    },
];

/// On/off control surface for one boolean mode flag.
pub struct FlagSwitch {
    coordinator: Coordinator,
    descriptor: &'static FlagDescriptor,
    overlay: Mutex<Option<bool>>,
    changes: ChangeSignal,
}

impl FlagSwitch {
    pub fn new(coordinator: Coordinator, kind: FlagKind) -> Self {
        let descriptor = FLAGS
            .iter()
            .find(|d| d.kind == kind)
            .expect("every FlagKind has a descriptor");
        Self {
            coordinator,
            descriptor,
            overlay: Mutex::new(None),
            changes: ChangeSignal::new(),
        }
    }

    /// One switch per writable flag, in table order.
    pub fn all(coordinator: &Coordinator) -> Vec<Self> {
        FLAGS
            .iter()
            .map(|d| Self::new(coordinator.clone(), d.kind))
            .collect()
    }

    pub fn kind(&self) -> FlagKind {
        self.descriptor.kind
    }

    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Rendered value: overlay first, then the snapshot; `None` when no
    /// snapshot is available yet.
    pub fn is_on(&self) -> Option<bool> {
        if let Some(value) = *self.overlay.lock().expect("overlay lock poisoned") {
            return Some(value);
        }
        self.coordinator
            .current()
            .map(|state| (self.descriptor.read)(&state))
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.set(true).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.set(false).await
    }

    pub async fn set(&self, value: bool) -> Result<(), CoreError> {
        *self.overlay.lock().expect("overlay lock poisoned") = Some(value);
        self.changes.bump();

        let write = submit(&self.coordinator, (self.descriptor.write)(value)).await;

        *self.overlay.lock().expect("overlay lock poisoned") = None;
        self.changes.bump();
        write.map_err(CoreError::from)
    }
}
