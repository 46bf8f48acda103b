//! Write command handlers: mode, temperature, fan, swing, flags.
//!
//! Each handler maps its argument into the domain vocabulary, drives
//! the matching control surface, and prints a one-line confirmation.
//! The surface takes care of the optimistic overlay and the follow-up
//! refresh; a rejected write surfaces as an error here.

use owo_colors::OwoColorize;

use virtus_core::Device;
use virtus_core::model::{FanMode, HvacMode, MAX_TEMP, MIN_TEMP, SwingAxis, SwingMode, SwingPosition};
use virtus_core::surface::FlagKind;

use crate::cli::{FanArgs, FlagArgs, GlobalOpts, ModeArgs, OnOff, SwingArgs, SwingCommand, TempArgs};
use crate::error::CliError;
use crate::output;

fn confirm(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if output::should_color(global.color) {
        println!("{} {message}", "✓".green());
    } else {
        println!("{message}");
    }
}

pub async fn handle_mode(
    device: &Device,
    args: &ModeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mode = HvacMode::from(args.mode);
    device.climate().set_hvac_mode(mode).await?;
    confirm(global, &format!("mode set to {mode}"));
    Ok(())
}

pub async fn handle_temp(
    device: &Device,
    args: &TempArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !(MIN_TEMP..=MAX_TEMP).contains(&args.degrees) {
        return Err(CliError::InvalidValue {
            message: format!(
                "target temperature {} is outside the supported {MIN_TEMP}-{MAX_TEMP} °C range",
                args.degrees
            ),
        });
    }

    device.climate().set_target_temperature(args.degrees).await?;
    confirm(global, &format!("target temperature set to {} °C", args.degrees));
    Ok(())
}

pub async fn handle_fan(
    device: &Device,
    args: &FanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let speed = FanMode::from(args.speed);
    device.climate().set_fan_mode(speed).await?;
    confirm(global, &format!("fan speed set to {speed}"));
    Ok(())
}

pub async fn handle_swing(
    device: &Device,
    args: &SwingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SwingCommand::Mode { mode } => {
            let mode = SwingMode::from(mode);
            device.climate().set_swing_mode(mode).await?;
            confirm(global, &format!("swing mode set to {mode}"));
        }
        SwingCommand::Set { axis, position } => {
            let axis = SwingAxis::from(axis);
            let position = SwingPosition::from(position);
            let select = device
                .swing_selects()
                .iter()
                .find(|s| s.axis() == axis)
                .ok_or_else(|| CliError::InvalidValue {
                    message: format!("no select for axis {axis}"),
                })?;
            select.select(position).await?;
            confirm(global, &format!("{axis} swing set to {position}"));
        }
    }
    Ok(())
}

pub async fn handle_flag(
    device: &Device,
    args: &FlagArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = FlagKind::from(args.flag);
    let switch = device
        .switches()
        .iter()
        .find(|s| s.kind() == kind)
        .ok_or_else(|| CliError::InvalidValue {
            message: format!("no switch for flag {kind}"),
        })?;

    let on = args.state == OnOff::On;
    switch.set(on).await?;
    confirm(
        global,
        &format!("{kind} turned {}", if on { "on" } else { "off" }),
    );
    Ok(())
}
