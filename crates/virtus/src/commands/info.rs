//! Info and errors commands: gateway metadata reads.

use std::fmt::Write as _;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use virtus_core::Device;

pub async fn handle(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let info = device.node_info().await?;

    println!(
        "{}",
        output::render_single(global.output, &info, |i| {
            let mut out = String::new();
            let _ = writeln!(out, "{}", i.label);
            let _ = writeln!(out, "  node:       {}", i.id);
            let _ = writeln!(out, "  device:     {}", i.device_id);
            let _ = writeln!(out, "  home:       {}", i.home_id);
            let _ = writeln!(out, "  model:      {}", i.model_number);
            let _ = writeln!(out, "  factory:    {}", i.factory_id);
            let _ = write!(out, "  category:   {}", i.icon);
            out
        })
    );
    Ok(())
}

/// The error report is an opaque vendor payload; print it raw.
pub async fn handle_errors(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let report = device.error_report().await?;

    println!(
        "{}",
        output::render_single(global.output, &report, |r| {
            serde_json::to_string_pretty(r).unwrap_or_else(|e| format!("serialization error: {e}"))
        })
    );
    Ok(())
}
