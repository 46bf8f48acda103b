//! Status command: one formatted snapshot of the device.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;

use virtus_core::surface::FlagKind;
use virtus_core::{Device, UpdateStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusView {
    device: String,
    mode: String,
    target_temperature: Option<f64>,
    current_temperature: Option<f64>,
    fan: Option<String>,
    swing: Option<String>,
    quiet: Option<bool>,
    sleep: Option<bool>,
    health: Option<bool>,
    frost_protection: Option<bool>,
    self_clean: Option<bool>,
    defrost: Option<bool>,
    last_reported: Option<String>,
    update_status: String,
}

fn flag_value(device: &Device, kind: FlagKind) -> Option<bool> {
    device
        .switches()
        .iter()
        .find(|s| s.kind() == kind)
        .and_then(virtus_core::FlagSwitch::is_on)
}

fn build_view(device: &Device) -> StatusView {
    let climate = device.climate();
    let update_status = match device.coordinator().status() {
        UpdateStatus::NotStarted => "not started".to_owned(),
        UpdateStatus::Ok { at } => format!("ok ({})", at.to_rfc3339()),
        UpdateStatus::Failed { reason } => format!("failed: {reason}"),
    };

    StatusView {
        device: device.config().device_name.clone(),
        mode: climate.hvac_mode().to_string(),
        target_temperature: climate.target_temperature(),
        current_temperature: climate.current_temperature(),
        fan: climate.fan_mode().map(|m| m.to_string()),
        swing: climate.swing_mode().map(|m| m.to_string()),
        quiet: flag_value(device, FlagKind::QuietMode),
        sleep: flag_value(device, FlagKind::SleepMode),
        health: flag_value(device, FlagKind::HealthMode),
        frost_protection: flag_value(device, FlagKind::FrostProtectionMode),
        self_clean: flag_value(device, FlagKind::SelfCleanMode),
        defrost: device.defrost().is_on(),
        last_reported: device.last_reported().value().map(|ts| ts.to_rfc3339()),
        update_status,
    }
}

fn opt_temp(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.1} °C"))
}

fn opt_str(value: Option<&String>) -> &str {
    value.map_or("-", String::as_str)
}

fn opt_flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "on",
        Some(false) => "off",
        None => "-",
    }
}

fn detail(view: &StatusView, color: bool) -> String {
    let mut out = String::new();
    let mode = if color && view.mode != "off" {
        view.mode.green().to_string()
    } else {
        view.mode.clone()
    };

    let _ = writeln!(out, "{}", view.device);
    let _ = writeln!(out, "  mode:         {mode}");
    let _ = writeln!(out, "  target:       {}", opt_temp(view.target_temperature));
    let _ = writeln!(out, "  current:      {}", opt_temp(view.current_temperature));
    let _ = writeln!(out, "  fan:          {}", opt_str(view.fan.as_ref()));
    let _ = writeln!(out, "  swing:        {}", opt_str(view.swing.as_ref()));
    let _ = writeln!(
        out,
        "  flags:        quiet {} / sleep {} / health {} / frost {} / clean {}",
        opt_flag(view.quiet),
        opt_flag(view.sleep),
        opt_flag(view.health),
        opt_flag(view.frost_protection),
        opt_flag(view.self_clean),
    );
    let _ = writeln!(out, "  defrost:      {}", opt_flag(view.defrost));
    let _ = writeln!(
        out,
        "  reported:     {}",
        opt_str(view.last_reported.as_ref())
    );
    let _ = write!(out, "  update:       {}", view.update_status);
    out
}

pub fn handle(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let view = build_view(device);
    let color = output::should_color(global.color);
    println!(
        "{}",
        output::render_single(global.output, &view, |v| detail(v, color))
    );
    Ok(())
}
