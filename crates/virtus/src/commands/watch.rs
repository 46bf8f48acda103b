//! Watch command: keep polling and print state lines as they change.

use std::time::Duration;

use chrono::Local;

use virtus_core::{Device, UpdateStatus};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;

fn state_line(device: &Device) -> String {
    let climate = device.climate();
    let target = climate
        .target_temperature()
        .map_or_else(|| "-".to_owned(), |v| format!("{v:.1}"));
    let current = climate
        .current_temperature()
        .map_or_else(|| "-".to_owned(), |v| format!("{v:.1}"));
    let fan = climate
        .fan_mode()
        .map_or_else(|| "-".to_owned(), |m| m.to_string());
    let swing = climate
        .swing_mode()
        .map_or_else(|| "-".to_owned(), |m| m.to_string());

    format!(
        "{} mode={} target={target} current={current} fan={fan} swing={swing}",
        Local::now().format("%H:%M:%S"),
        climate.hvac_mode(),
    )
}

pub async fn handle(
    device: &Device,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut rx = device.coordinator().subscribe();
    let mut status_rx = device.coordinator().subscribe_status();

    if !global.quiet {
        println!("{}", state_line(device));
    }

    // The device's own poll task keeps running; this extra ticker only
    // matters when --interval is shorter than the configured cadence.
    // Overlapping requests coalesce inside the coordinator.
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let _ = device.coordinator().request_refresh().await;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", state_line(device));
            }
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if let UpdateStatus::Failed { reason } = device.coordinator().status() {
                    eprintln!("refresh failed: {reason} (showing last known state)");
                }
            }
        }
    }

    Ok(())
}
