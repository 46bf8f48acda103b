// ── Control surfaces ──
//
// UI-facing views over the coordinator's snapshot, one per affordance:
// climate (mode/temperature/fan/swing), flag switches, per-axis swing
// selects, and the read-only sensors. All write-capable surfaces share
// the same shape: render overlay-then-snapshot, and on a command set the
// optimistic overlay, signal observers, write through the gateway,
// request a refresh, then clear the overlay unconditionally.

mod climate;
mod select;
mod sensor;
mod switch;

pub use climate::ClimateSurface;
pub use select::SwingSelect;
pub use sensor::{DefrostSensor, LastReportedSensor};
pub use switch::{FlagKind, FlagSwitch};

use tokio::sync::watch;
use tracing::warn;

use virtus_api::StateChange;

use crate::coordinator::Coordinator;

/// Change notification for one surface. Every overlay mutation bumps a
/// version counter observers can watch; the rendered value itself is
/// re-derived on read.
pub(crate) struct ChangeSignal {
    version: watch::Sender<u64>,
}

impl ChangeSignal {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self { version }
    }

    pub(crate) fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

/// Shared command tail: gateway write followed by an out-of-band
/// coordinator refresh. The refresh outcome is not propagated here --
/// the coordinator's status channel already carries it; the write
/// outcome is returned so the caller can surface a rejected command.
pub(crate) async fn submit(
    coordinator: &Coordinator,
    change: StateChange,
) -> Result<(), virtus_api::Error> {
    let write = coordinator.client().set_state(&change).await;
    if let Err(e) = &write {
        warn!(error = %e, "state write failed");
    }
    let _ = coordinator.request_refresh().await;
    write
}
