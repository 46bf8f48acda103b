// ── Vendor → domain derivations ──
//
// Read-side translation from the wire snapshot into the platform
// vocabulary. Unknown vendor values degrade to the auto/neutral variant
// instead of failing -- the snapshot itself was already validated
// all-or-nothing at parse time.

use chrono::{DateTime, NaiveDateTime, Utc};

use virtus_api::AcState;

use crate::model::{FanMode, HvacMode, Power, SwingAxis, SwingMode, SwingPosition};

/// Climate-mode view: power OFF wins over whatever operating mode the
/// device last reported; unknown vendor modes render as `Auto`.
pub fn hvac_mode(state: &AcState) -> HvacMode {
    if Power::is_off_wire(&state.power) {
        return HvacMode::Off;
    }
    operating_mode(&state.operating_mode)
}

/// Map a vendor operating mode, defaulting unknowns to `Auto`.
pub fn operating_mode(wire: &str) -> HvacMode {
    match wire {
        "COOL" => HvacMode::Cool,
        "HEAT" => HvacMode::Heat,
        "DRY" => HvacMode::Dry,
        "FAN" => HvacMode::FanOnly,
        _ => HvacMode::Auto,
    }
}

/// Map a vendor fan speed, defaulting unknowns to `Auto`.
pub fn fan_mode(state: &AcState) -> FanMode {
    match state.fan_speed.as_str() {
        "LOW" => FanMode::Low,
        "MEDIUM" => FanMode::Medium,
        "HIGH" => FanMode::High,
        _ => FanMode::Auto,
    }
}

/// Combined swing view: which axes are sweeping.
pub fn swing_mode(state: &AcState) -> SwingMode {
    let h_auto = state.swing_orientation.horizontal == "AUTO";
    let v_auto = state.swing_orientation.vertical == "AUTO";
    match (h_auto, v_auto) {
        (true, true) => SwingMode::Both,
        (false, true) => SwingMode::Vertical,
        (true, false) => SwingMode::Horizontal,
        (false, false) => SwingMode::Off,
    }
}

/// Discrete position of one axis, defaulting unknowns to `Auto`.
pub fn swing_position(state: &AcState, axis: SwingAxis) -> SwingPosition {
    let wire = match axis {
        SwingAxis::Horizontal => state.swing_orientation.horizontal.as_str(),
        SwingAxis::Vertical => state.swing_orientation.vertical.as_str(),
    };
    match wire {
        "NIV_1" => SwingPosition::Level1,
        "NIV_2" => SwingPosition::Level2,
        "NIV_3" => SwingPosition::Level3,
        "NIV_4" => SwingPosition::Level4,
        "NIV_5" => SwingPosition::Level5,
        _ => SwingPosition::Auto,
    }
}

/// Parse the remote's last-reported marker. The service emits RFC 3339
/// with a trailing `Z`; some firmware drops the offset entirely, which
/// is taken as UTC. Unparsable input is "unknown", never an error.
pub fn last_reported(state: &AcState) -> Option<DateTime<Utc>> {
    let raw = state.last_reported_date.as_str();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use virtus_api::{AcState, SwingOrientation};

    use super::{fan_mode, hvac_mode, last_reported, swing_mode, swing_position};
    use crate::model::{FanMode, HvacMode, SwingAxis, SwingMode, SwingPosition};

    fn state() -> AcState {
        AcState {
            target_temperature: 22.0,
            current_temperature: 24.5,
            operating_mode: "COOL".into(),
            power: "ON".into(),
            fan_speed: "LOW".into(),
            swing_orientation: SwingOrientation {
                horizontal: "NIV_2".into(),
                vertical: "AUTO".into(),
            },
            health_mode: false,
            frost_protection_mode: false,
            self_clean_mode: false,
            quiet_mode: true,
            sleep_mode: false,
            defrost_mode: false,
            last_reported_date: "2024-06-15T10:30:00Z".into(),
        }
    }

    #[test]
    fn power_off_wins_over_operating_mode() {
        let mut s = state();
        s.power = "OFF".into();
        assert_eq!(hvac_mode(&s), HvacMode::Off);
    }

    #[test]
    fn unknown_operating_mode_renders_auto() {
        let mut s = state();
        s.operating_mode = "TURBO".into();
        assert_eq!(hvac_mode(&s), HvacMode::Auto);
    }

    #[test]
    fn unknown_fan_speed_renders_auto() {
        let mut s = state();
        s.fan_speed = "ULTRA".into();
        assert_eq!(fan_mode(&s), FanMode::Auto);
    }

    #[test]
    fn swing_view_reflects_sweeping_axes() {
        let mut s = state();
        assert_eq!(swing_mode(&s), SwingMode::Vertical);

        s.swing_orientation.horizontal = "AUTO".into();
        assert_eq!(swing_mode(&s), SwingMode::Both);

        s.swing_orientation.vertical = "NIV_1".into();
        assert_eq!(swing_mode(&s), SwingMode::Horizontal);

        s.swing_orientation.horizontal = "NIV_3".into();
        assert_eq!(swing_mode(&s), SwingMode::Off);
    }

    #[test]
    fn per_axis_positions_are_independent() {
        let s = state();
        assert_eq!(
            swing_position(&s, SwingAxis::Horizontal),
            SwingPosition::Level2
        );
        assert_eq!(swing_position(&s, SwingAxis::Vertical), SwingPosition::Auto);
    }

    #[test]
    fn last_reported_accepts_zulu_and_naive() {
        let mut s = state();
        let expected = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        assert_eq!(last_reported(&s), Some(expected));

        s.last_reported_date = "2024-06-15T10:30:00+00:00".into();
        assert_eq!(last_reported(&s), Some(expected));

        s.last_reported_date = "2024-06-15T10:30:00".into();
        assert_eq!(last_reported(&s), Some(expected));
    }

    #[test]
    fn garbage_timestamp_is_unknown_not_error() {
        let mut s = state();
        s.last_reported_date = "yesterday-ish".into();
        assert_eq!(last_reported(&s), None);
    }
}
