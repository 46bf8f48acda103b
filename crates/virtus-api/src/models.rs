// Wire types for the Enki airco and node-aggregation services.
//
// Everything here mirrors the remote JSON shapes field for field. Vendor
// vocabulary (mode/power/fan/swing values) stays as plain strings at this
// layer; `virtus-core` owns the translation into domain enums.

use serde::{Deserialize, Serialize};

// ── Token endpoint ──────────────────────────────────────────────────

/// Keycloak token response for both `password` and `refresh_token` grants.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds. The server may omit it.
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

pub(crate) fn default_expires_in() -> u64 {
    7200
}

// ── State read ──────────────────────────────────────────────────────

/// Louver orientation, one value per axis (`AUTO` or `NIV_1`..`NIV_5`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingOrientation {
    pub horizontal: String,
    pub vertical: String,
}

/// The `lastReportedValue` object inside a state-read response.
///
/// Every field is required: a response missing any of them fails to
/// deserialize and the whole snapshot is discarded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportedValue {
    pub target_temperature: f64,
    pub current_temperature: f64,
    pub operating_mode: String,
    pub power: String,
    pub fan_speed: String,
    pub swing_orientation: SwingOrientation,
    pub health_mode: bool,
    pub frost_protection_mode: bool,
    pub self_clean_mode: bool,
    pub quiet_mode: bool,
    pub sleep_mode: bool,
    pub defrost_mode: bool,
}

/// Full state-read response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StateEnvelope {
    pub last_reported_value: ReportedValue,
    pub last_reported_date: String,
}

/// One complete device state snapshot.
///
/// Wholesale-replaced on every successful poll, never partially mutated.
/// `last_reported_date` is the remote's own freshness marker, not the
/// wall-clock time of the local poll.
#[derive(Debug, Clone, PartialEq)]
pub struct AcState {
    pub target_temperature: f64,
    pub current_temperature: f64,
    pub operating_mode: String,
    pub power: String,
    pub fan_speed: String,
    pub swing_orientation: SwingOrientation,
    pub health_mode: bool,
    pub frost_protection_mode: bool,
    pub self_clean_mode: bool,
    pub quiet_mode: bool,
    pub sleep_mode: bool,
    pub defrost_mode: bool,
    pub last_reported_date: String,
}

impl From<StateEnvelope> for AcState {
    fn from(envelope: StateEnvelope) -> Self {
        let value = envelope.last_reported_value;
        Self {
            target_temperature: value.target_temperature,
            current_temperature: value.current_temperature,
            operating_mode: value.operating_mode,
            power: value.power,
            fan_speed: value.fan_speed,
            swing_orientation: value.swing_orientation,
            health_mode: value.health_mode,
            frost_protection_mode: value.frost_protection_mode,
            self_clean_mode: value.self_clean_mode,
            quiet_mode: value.quiet_mode,
            sleep_mode: value.sleep_mode,
            defrost_mode: value.defrost_mode,
            last_reported_date: envelope.last_reported_date,
        }
    }
}

// ── State write ─────────────────────────────────────────────────────

/// Parameters for a state write. `None` means "leave unchanged" for
/// temperature, mode, power and fan; the remote treats absence as
/// no-change only for those. Boolean flags have no such sentinel at the
/// wire level -- an unset flag is written as explicit `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateChange {
    pub target_temperature: Option<f64>,
    pub operating_mode: Option<String>,
    pub power: Option<String>,
    pub fan_speed: Option<String>,
    pub health_mode: Option<bool>,
    pub frost_protection_mode: Option<bool>,
    pub self_clean_mode: Option<bool>,
    pub quiet_mode: Option<bool>,
    pub sleep_mode: Option<bool>,
    pub swing_horizontal: Option<String>,
    pub swing_vertical: Option<String>,
}

/// The exact JSON body of a change-state request.
///
/// The remote requires every key on every write: unspecified flags
/// serialize as `false`, unspecified pass-through fields as `null`, and
/// `currentTemperature` is always `null` (read-only). Swing is either
/// absent (`null`) or carries both axes, the unspecified one as `AUTO`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WritePayload {
    pub target_temperature: Option<f64>,
    pub current_temperature: Option<f64>,
    pub operating_mode: Option<String>,
    pub power: Option<String>,
    pub fan_speed: Option<String>,
    pub frost_protection_mode: bool,
    pub self_clean_mode: bool,
    pub health_mode: bool,
    pub quiet_mode: bool,
    pub sleep_mode: bool,
    pub swing_orientation: Option<SwingOrientation>,
}

impl From<&StateChange> for WritePayload {
    fn from(change: &StateChange) -> Self {
        let swing_orientation = if change.swing_horizontal.is_some()
            || change.swing_vertical.is_some()
        {
            Some(SwingOrientation {
                horizontal: change
                    .swing_horizontal
                    .clone()
                    .unwrap_or_else(|| "AUTO".to_owned()),
                vertical: change
                    .swing_vertical
                    .clone()
                    .unwrap_or_else(|| "AUTO".to_owned()),
            })
        } else {
            None
        };

        Self {
            target_temperature: change.target_temperature,
            current_temperature: None,
            operating_mode: change.operating_mode.clone(),
            power: change.power.clone(),
            fan_speed: change.fan_speed.clone(),
            frost_protection_mode: change.frost_protection_mode.unwrap_or(false),
            self_clean_mode: change.self_clean_mode.unwrap_or(false),
            health_mode: change.health_mode.unwrap_or(false),
            quiet_mode: change.quiet_mode.unwrap_or(false),
            sleep_mode: change.sleep_mode.unwrap_or(false),
            swing_orientation,
        }
    }
}

// ── Node info ───────────────────────────────────────────────────────

/// Device metadata from the node-aggregation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub id: String,
    pub device_id: String,
    pub home_id: String,
    pub label: String,
    pub model_number: String,
    pub factory_id: String,
    pub icon: String,
}

// ── Discovery ───────────────────────────────────────────────────────

/// Home dashboard response. Only the node list matters here.
#[derive(Debug, Deserialize)]
pub(crate) struct Dashboard {
    #[serde(default)]
    pub nodes: Vec<DashboardNode>,
}

/// One node entry on the home dashboard. Nodes of other categories
/// (heaters, plugs, ...) appear here too; the `icon` field is the
/// category marker discovery filters on.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DashboardNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// An air-conditioner node found in the home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    pub node_id: String,
    pub label: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_payload_defaults_unset_flags_to_false() {
        let change = StateChange {
            quiet_mode: Some(true),
            ..StateChange::default()
        };
        let json = serde_json::to_value(WritePayload::from(&change)).expect("serialize");

        assert_eq!(json["quietMode"], serde_json::json!(true));
        for flag in [
            "healthMode",
            "frostProtectionMode",
            "selfCleanMode",
            "sleepMode",
        ] {
            assert_eq!(json[flag], serde_json::json!(false), "{flag}");
        }
        // Pass-through fields are explicit nulls, never omitted.
        assert!(json["targetTemperature"].is_null());
        assert!(json["currentTemperature"].is_null());
        assert!(json["operatingMode"].is_null());
        assert!(json["power"].is_null());
        assert!(json["fanSpeed"].is_null());
        assert!(json["swingOrientation"].is_null());
    }

    #[test]
    fn write_payload_fills_missing_swing_axis_with_auto() {
        let change = StateChange {
            swing_vertical: Some("NIV_2".to_owned()),
            ..StateChange::default()
        };
        let json = serde_json::to_value(WritePayload::from(&change)).expect("serialize");

        assert_eq!(json["swingOrientation"]["vertical"], "NIV_2");
        assert_eq!(json["swingOrientation"]["horizontal"], "AUTO");
    }

    #[test]
    fn state_envelope_requires_every_field() {
        // quietMode removed -- the whole parse must fail, not default.
        let body = serde_json::json!({
            "lastReportedValue": {
                "targetTemperature": 22.0,
                "currentTemperature": 24.5,
                "operatingMode": "COOL",
                "power": "ON",
                "fanSpeed": "LOW",
                "swingOrientation": {"horizontal": "AUTO", "vertical": "NIV_1"},
                "healthMode": false,
                "frostProtectionMode": false,
                "selfCleanMode": false,
                "sleepMode": false,
                "defrostMode": false
            },
            "lastReportedDate": "2024-06-15T10:30:00Z"
        });

        let parsed: Result<StateEnvelope, _> = serde_json::from_value(body);
        assert!(parsed.is_err());
    }
}
