//! Command handlers and dispatch.

pub mod config_cmd;
pub mod control;
pub mod discover;
pub mod info;
pub mod status;
pub mod watch;

use virtus_core::Device;
use virtus_core::model::{FanMode, HvacMode, SwingAxis, SwingMode, SwingPosition};
use virtus_core::surface::FlagKind;

use crate::cli::{
    AxisArg, Command, FanArg, FlagArg, GlobalOpts, ModeArg, PositionArg, SwingModeArg,
};
use crate::error::CliError;

/// Route a command that needs a connected device.
pub async fn dispatch(cmd: Command, device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(device, global),
        Command::Watch(args) => watch::handle(device, &args, global).await,
        Command::Mode(args) => control::handle_mode(device, &args, global).await,
        Command::Temp(args) => control::handle_temp(device, &args, global).await,
        Command::Fan(args) => control::handle_fan(device, &args, global).await,
        Command::Swing(args) => control::handle_swing(device, &args, global).await,
        Command::Flag(args) => control::handle_flag(device, &args, global).await,
        // Handled before a device is built; unreachable here.
        Command::Info
        | Command::Errors
        | Command::Discover
        | Command::Config(_)
        | Command::Completions(_) => Ok(()),
    }
}

// ── CLI argument → domain conversions ───────────────────────────────

impl From<ModeArg> for HvacMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Off => Self::Off,
            ModeArg::Cool => Self::Cool,
            ModeArg::Heat => Self::Heat,
            ModeArg::Dry => Self::Dry,
            ModeArg::Fan => Self::FanOnly,
            ModeArg::Auto => Self::Auto,
        }
    }
}

impl From<FanArg> for FanMode {
    fn from(arg: FanArg) -> Self {
        match arg {
            FanArg::Low => Self::Low,
            FanArg::Medium => Self::Medium,
            FanArg::High => Self::High,
            FanArg::Auto => Self::Auto,
        }
    }
}

impl From<SwingModeArg> for SwingMode {
    fn from(arg: SwingModeArg) -> Self {
        match arg {
            SwingModeArg::Off => Self::Off,
            SwingModeArg::Vertical => Self::Vertical,
            SwingModeArg::Horizontal => Self::Horizontal,
            SwingModeArg::Both => Self::Both,
        }
    }
}

impl From<AxisArg> for SwingAxis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Horizontal => Self::Horizontal,
            AxisArg::Vertical => Self::Vertical,
        }
    }
}

impl From<PositionArg> for SwingPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Auto => Self::Auto,
            PositionArg::Level1 => Self::Level1,
            PositionArg::Level2 => Self::Level2,
            PositionArg::Level3 => Self::Level3,
            PositionArg::Level4 => Self::Level4,
            PositionArg::Level5 => Self::Level5,
        }
    }
}

impl From<FlagArg> for FlagKind {
    fn from(arg: FlagArg) -> Self {
        match arg {
            FlagArg::Quiet => Self::QuietMode,
            FlagArg::Sleep => Self::SleepMode,
            FlagArg::Health => Self::HealthMode,
            FlagArg::FrostProtection => Self::FrostProtectionMode,
            FlagArg::SelfClean => Self::SelfCleanMode,
        }
    }
}
