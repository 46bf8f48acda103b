//! Polling coordinator and control surfaces between `virtus-api` and UI
//! consumers.
//!
//! This crate owns the cached device state and everything that renders
//! or mutates it:
//!
//! - **[`Device`]** — Owning facade per configured air conditioner:
//!   [`connect()`](Device::connect) authenticates, performs the first
//!   refresh (setup aborts on failure), then polls in the background.
//!
//! - **[`Coordinator`]** — The single cached [`AcState`] snapshot behind
//!   a `tokio::sync::watch` channel, wholesale-replaced on every
//!   successful poll and held stale-but-readable on failure. Overlapping
//!   refresh requests coalesce into one in-flight fetch.
//!
//! - **Control surfaces** ([`surface`]) — Climate, flag switches,
//!   per-axis swing selects, and the read-only sensors. Each renders
//!   overlay-then-snapshot and clears its optimistic overlay
//!   unconditionally once a command's refresh completes.
//!
//! - **Domain model** ([`model`], [`convert`]) — Platform vocabulary
//!   (modes, fan speeds, swing positions) and the derivations from the
//!   vendor's wire values, unknown values degrading to auto.
//!
//! [`AcState`]: virtus_api::AcState

pub mod config;
pub mod convert;
pub mod coordinator;
pub mod device;
pub mod error;
pub mod model;
pub mod surface;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_POLL_INTERVAL, DeviceConfig};
pub use coordinator::{Coordinator, UpdateStatus};
pub use device::Device;
pub use error::CoreError;
pub use surface::{
    ClimateSurface, DefrostSensor, FlagKind, FlagSwitch, LastReportedSensor, SwingSelect,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    FanMode, HvacMode, MAX_TEMP, MIN_TEMP, Power, SwingAxis, SwingMode, SwingPosition, TEMP_STEP,
};
