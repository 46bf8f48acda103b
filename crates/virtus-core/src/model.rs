// ── Domain model ──
//
// Platform-facing control vocabulary. The vendor side of every enum is
// the wire string the Enki airco service speaks (`COOL`, `NIV_1`, ...);
// the strum serializations are the values consumers type and read.
// Unknown vendor values never fail a view -- they degrade to the enum's
// auto/neutral variant (see `convert`).

use strum::{Display, EnumIter, EnumString};

/// Lowest settable target temperature (°C).
pub const MIN_TEMP: f64 = 16.0;
/// Highest settable target temperature (°C).
pub const MAX_TEMP: f64 = 30.0;
/// Target temperature step (°C).
pub const TEMP_STEP: f64 = 1.0;

// ── Power ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Power {
    On,
    Off,
}

impl Power {
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    pub fn is_off_wire(value: &str) -> bool {
        value == "OFF"
    }
}

// ── Climate mode ────────────────────────────────────────────────────

/// Platform-facing climate mode. `Off` reflects device power, not a
/// vendor operating mode -- the device keeps its last mode while off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HvacMode {
    Off,
    Cool,
    Heat,
    Dry,
    #[strum(serialize = "fan_only", serialize = "fan")]
    FanOnly,
    Auto,
}

impl HvacMode {
    /// Vendor operating-mode value. `None` for `Off`, which is expressed
    /// through the power field instead.
    pub fn to_wire(self) -> Option<&'static str> {
        match self {
            Self::Off => None,
            Self::Cool => Some("COOL"),
            Self::Heat => Some("HEAT"),
            Self::Dry => Some("DRY"),
            Self::FanOnly => Some("FAN"),
            Self::Auto => Some("AUTO"),
        }
    }
}

// ── Fan speed ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FanMode {
    Low,
    Medium,
    High,
    Auto,
}

impl FanMode {
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Auto => "AUTO",
        }
    }
}

// ── Swing ───────────────────────────────────────────────────────────

/// Combined swing view over both louver axes. An axis sweeps when it is
/// set to `AUTO` and holds still on a fixed position level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SwingMode {
    Off,
    Vertical,
    Horizontal,
    Both,
}

/// One louver axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SwingAxis {
    Horizontal,
    Vertical,
}

/// Discrete louver position on one axis: sweeping, or one of up to five
/// fixed levels. The vertical axis only reaches level 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum SwingPosition {
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "position_1")]
    Level1,
    #[strum(serialize = "position_2")]
    Level2,
    #[strum(serialize = "position_3")]
    Level3,
    #[strum(serialize = "position_4")]
    Level4,
    #[strum(serialize = "position_5")]
    Level5,
}

impl SwingPosition {
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Level1 => "NIV_1",
            Self::Level2 => "NIV_2",
            Self::Level3 => "NIV_3",
            Self::Level4 => "NIV_4",
            Self::Level5 => "NIV_5",
        }
    }
}

impl SwingAxis {
    /// The positions this axis supports.
    pub fn options(self) -> &'static [SwingPosition] {
        match self {
            Self::Vertical => &[
                SwingPosition::Auto,
                SwingPosition::Level1,
                SwingPosition::Level2,
                SwingPosition::Level3,
                SwingPosition::Level4,
            ],
            Self::Horizontal => &[
                SwingPosition::Auto,
                SwingPosition::Level1,
                SwingPosition::Level2,
                SwingPosition::Level3,
                SwingPosition::Level4,
                SwingPosition::Level5,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{FanMode, HvacMode, SwingAxis, SwingPosition};

    #[test]
    fn hvac_mode_names_round_trip() {
        assert_eq!(HvacMode::FanOnly.to_string(), "fan_only");
        assert_eq!(HvacMode::from_str("fan").ok(), Some(HvacMode::FanOnly));
        assert_eq!(HvacMode::from_str("cool").ok(), Some(HvacMode::Cool));
        assert!(HvacMode::from_str("turbo").is_err());
    }

    #[test]
    fn off_has_no_wire_mode() {
        assert_eq!(HvacMode::Off.to_wire(), None);
        assert_eq!(HvacMode::Dry.to_wire(), Some("DRY"));
    }

    #[test]
    fn fan_mode_wire_values() {
        assert_eq!(FanMode::Medium.to_wire(), "MEDIUM");
        assert_eq!(FanMode::from_str("auto").ok(), Some(FanMode::Auto));
    }

    #[test]
    fn vertical_axis_stops_at_level_four() {
        assert!(!SwingAxis::Vertical.options().contains(&SwingPosition::Level5));
        assert!(SwingAxis::Horizontal.options().contains(&SwingPosition::Level5));
    }

    #[test]
    fn swing_position_display_names() {
        assert_eq!(SwingPosition::Level3.to_string(), "position_3");
        assert_eq!(
            SwingPosition::from_str("position_5").ok(),
            Some(SwingPosition::Level5)
        );
    }
}
