#![allow(clippy::unwrap_used)]
// Integration tests for the control surfaces: optimistic overlay
// semantics, write mapping, and view derivations, against wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use virtus_api::{ClientConfig, VirtusClient};
use virtus_core::error::CoreError;
use virtus_core::model::{FanMode, HvacMode, SwingAxis, SwingMode, SwingPosition};
use virtus_core::surface::FlagKind;
use virtus_core::{Device, DeviceConfig};

// ── Helpers ─────────────────────────────────────────────────────────

const STATE_PATH: &str =
    "/api-enki-equation-airco-prod/v1/equation-airco/N1/check-airconditioner-state";
const CHANGE_PATH: &str =
    "/api-enki-equation-airco-prod/v1/equation-airco/N1/change-airconditioner-state";

fn device_for(server: &MockServer) -> Device {
    let client = Arc::new(VirtusClient::with_client(
        reqwest::Client::new(),
        ClientConfig {
            base_url: Url::parse(&server.uri()).unwrap(),
            token_url: Url::parse(&format!("{}/auth/token", server.uri())).unwrap(),
            username: Some("user@example.com".into()),
            password: Some("hunter2".to_string().into()),
            home_id: Some("H1".into()),
            node_id: Some("N1".into()),
            ..ClientConfig::default()
        },
    ));
    let config = DeviceConfig::new(
        "user@example.com",
        "hunter2".to_string().into(),
        "H1",
        "N1",
        "Living room AC",
    )
    .with_poll_interval(Duration::ZERO);
    Device::with_client(config, client)
}

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A",
            "refresh_token": "B",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

fn state_with(value: serde_json::Value) -> serde_json::Value {
    let mut body = json!({
        "lastReportedValue": {
            "targetTemperature": 22.0,
            "currentTemperature": 24.5,
            "operatingMode": "COOL",
            "power": "ON",
            "fanSpeed": "LOW",
            "swingOrientation": {"horizontal": "NIV_2", "vertical": "NIV_3"},
            "healthMode": false,
            "frostProtectionMode": false,
            "selfCleanMode": false,
            "quietMode": false,
            "sleepMode": false,
            "defrostMode": false
        },
        "lastReportedDate": "2024-06-15T10:30:00Z"
    });
    if let Some(overrides) = value.as_object() {
        let reported = body["lastReportedValue"].as_object_mut().unwrap();
        for (k, v) in overrides {
            reported.insert(k.clone(), v.clone());
        }
    }
    body
}

async fn mount_state(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(STATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// The full wire body for a change request: every flag false, every
/// pass-through null, with `overrides` applied on top.
fn write_body(overrides: serde_json::Value) -> serde_json::Value {
    let mut body = json!({
        "targetTemperature": null,
        "currentTemperature": null,
        "operatingMode": null,
        "power": null,
        "fanSpeed": null,
        "frostProtectionMode": false,
        "selfCleanMode": false,
        "healthMode": false,
        "quietMode": false,
        "sleepMode": false,
        "swingOrientation": null
    });
    if let Some(overrides) = overrides.as_object() {
        for (k, v) in overrides {
            body[k] = v.clone();
        }
    }
    body
}

// ── Overlay semantics ───────────────────────────────────────────────

#[tokio::test]
async fn test_overlay_shows_commanded_value_until_refresh() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    // The write is slow, so the overlay window is observable.
    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let device = Arc::new(device_for(&server));
    device.connect().await.unwrap();
    assert_eq!(device.climate().fan_mode(), Some(FanMode::Low));

    let worker = Arc::clone(&device);
    let command =
        tokio::spawn(async move { worker.climate().set_fan_mode(FanMode::High).await });

    // Mid-command: the rendered value is the commanded one even though
    // the snapshot still says LOW.
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(device.climate().fan_mode(), Some(FanMode::High));

    command.await.unwrap().unwrap();

    // After the command's refresh the overlay is gone; the snapshot
    // (still LOW -- the mock never changed it) is what renders.
    assert_eq!(device.climate().fan_mode(), Some(FanMode::Low));
}

#[tokio::test]
async fn test_overlay_cleared_even_when_write_rejected() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    let result = device.climate().set_fan_mode(FanMode::High).await;
    assert!(
        matches!(result, Err(CoreError::WriteFailed { .. })),
        "expected WriteFailed, got: {result:?}"
    );

    // No rollback logic, no stuck overlay: the next render comes from
    // the snapshot again.
    assert_eq!(device.climate().fan_mode(), Some(FanMode::Low));
}

// ── Climate views and writes ────────────────────────────────────────

#[tokio::test]
async fn test_hvac_mode_off_wins_over_operating_mode() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({"power": "OFF", "operatingMode": "HEAT"}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    assert_eq!(device.climate().hvac_mode(), HvacMode::Off);
}

#[tokio::test]
async fn test_set_hvac_mode_off_writes_power_only() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .and(body_json(write_body(json!({"power": "OFF"}))))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();
    device.climate().set_hvac_mode(HvacMode::Off).await.unwrap();
}

#[tokio::test]
async fn test_set_hvac_mode_heat_powers_on() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .and(body_json(write_body(
            json!({"power": "ON", "operatingMode": "HEAT"}),
        )))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();
    device.climate().set_hvac_mode(HvacMode::Heat).await.unwrap();
}

#[tokio::test]
async fn test_turn_on_restores_last_known_mode_optimistically() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(
        &server,
        state_with(json!({"power": "OFF", "operatingMode": "DRY"})),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .and(body_json(write_body(json!({"power": "ON"}))))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let device = Arc::new(device_for(&server));
    device.connect().await.unwrap();
    assert_eq!(device.climate().hvac_mode(), HvacMode::Off);

    let worker = Arc::clone(&device);
    let command = tokio::spawn(async move { worker.climate().turn_on().await });

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(device.climate().hvac_mode(), HvacMode::Dry);

    command.await.unwrap().unwrap();
}

// ── Swing: combined mode and per-axis selects ───────────────────────

#[tokio::test]
async fn test_swing_mode_round_trip() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    // Initial snapshot: both axes parked -> "off".
    Mock::given(method("GET"))
        .and(path(STATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_with(json!({}))))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // After the "both" command the device reports both axes sweeping.
    Mock::given(method("GET"))
        .and(path(STATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_with(
            json!({"swingOrientation": {"horizontal": "AUTO", "vertical": "AUTO"}}),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // After the "vertical" command the horizontal axis holds NIV_2.
    Mock::given(method("GET"))
        .and(path(STATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_with(
            json!({"swingOrientation": {"horizontal": "NIV_2", "vertical": "AUTO"}}),
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();
    assert_eq!(device.climate().swing_mode(), Some(SwingMode::Off));

    device.climate().set_swing_mode(SwingMode::Both).await.unwrap();
    assert_eq!(device.climate().swing_mode(), Some(SwingMode::Both));

    device
        .climate()
        .set_swing_mode(SwingMode::Vertical)
        .await
        .unwrap();
    assert_eq!(device.climate().swing_mode(), Some(SwingMode::Vertical));
}

#[tokio::test]
async fn test_swing_off_parks_both_axes_on_lowest_level() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .and(body_json(write_body(
            json!({"swingOrientation": {"horizontal": "NIV_1", "vertical": "NIV_1"}}),
        )))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();
    device.climate().set_swing_mode(SwingMode::Off).await.unwrap();
}

#[tokio::test]
async fn test_axis_selects_render_independently() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(
        &server,
        state_with(json!({"swingOrientation": {"horizontal": "NIV_5", "vertical": "AUTO"}})),
    )
    .await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    let [vertical, horizontal] = device.swing_selects();
    assert_eq!(vertical.axis(), SwingAxis::Vertical);
    assert_eq!(vertical.current(), Some(SwingPosition::Auto));
    assert_eq!(horizontal.current(), Some(SwingPosition::Level5));
}

#[tokio::test]
async fn test_axis_select_writes_single_axis() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    // Only the vertical axis is commanded; the gateway wires the other
    // axis as AUTO because the remote requires both axes together.
    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .and(body_json(write_body(
            json!({"swingOrientation": {"horizontal": "AUTO", "vertical": "NIV_4"}}),
        )))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    let [vertical, _] = device.swing_selects();
    vertical.select(SwingPosition::Level4).await.unwrap();
}

#[tokio::test]
async fn test_vertical_axis_rejects_level_five() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    let [vertical, _] = device.swing_selects();
    let result = vertical.select(SwingPosition::Level5).await;
    assert!(matches!(result, Err(CoreError::InvalidValue { .. })));
}

// ── Flag switches ───────────────────────────────────────────────────

#[tokio::test]
async fn test_quiet_switch_writes_single_flag() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({}))).await;

    Mock::given(method("POST"))
        .and(path(CHANGE_PATH))
        .and(body_json(write_body(json!({"quietMode": true}))))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    let quiet = device
        .switches()
        .iter()
        .find(|s| s.kind() == FlagKind::QuietMode)
        .unwrap();
    assert_eq!(quiet.is_on(), Some(false));
    quiet.turn_on().await.unwrap();
}

#[tokio::test]
async fn test_switch_table_covers_all_five_flags() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({"sleepMode": true, "healthMode": true}))).await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    let kinds: Vec<FlagKind> = device.switches().iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FlagKind::QuietMode,
            FlagKind::SleepMode,
            FlagKind::HealthMode,
            FlagKind::FrostProtectionMode,
            FlagKind::SelfCleanMode,
        ]
    );

    let on: Vec<bool> = device
        .switches()
        .iter()
        .map(|s| s.is_on().unwrap())
        .collect();
    assert_eq!(on, vec![false, true, true, false, false]);
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sensors_before_first_poll_are_unknown() {
    let server = MockServer::start().await;
    let device = device_for(&server);

    assert_eq!(device.defrost().is_on(), None);
    assert_eq!(device.last_reported().value(), None);
    assert_eq!(device.climate().hvac_mode(), HvacMode::Off);
    assert_eq!(device.climate().current_temperature(), None);
}

#[tokio::test]
async fn test_defrost_and_last_reported_views() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_state(&server, state_with(json!({"defrostMode": true}))).await;

    let device = device_for(&server);
    device.connect().await.unwrap();

    assert_eq!(device.defrost().is_on(), Some(true));
    let reported = device.last_reported().value().unwrap();
    assert_eq!(reported.to_rfc3339(), "2024-06-15T10:30:00+00:00");
}
