//! Config subcommand handlers.
//!
//! `init` reproduces the vendor app's onboarding: log in, enter the
//! home id, pick one of the discovered air conditioners, store the
//! password (keyring by default), write the config file.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};

use virtus_config::{Config, DeviceSection};
use virtus_core::{Device, DeviceConfig};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

// ── Helpers ─────────────────────────────────────────────────────────

fn interactive_err(err: &dialoguer::Error) -> CliError {
    CliError::Interactive {
        message: format!("prompt failed: {err}"),
    }
}

fn config_err(source: virtus_config::ConfigError) -> CliError {
    CliError::Config {
        path: virtus_config::config_path().display().to_string(),
        source,
    }
}

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    if let Some(ref device) = cfg.device {
        let _ = writeln!(out);
        let _ = writeln!(out, "[device]");
        let _ = writeln!(out, "username = \"{}\"", device.username);
        if device.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = device.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        let _ = writeln!(out, "home_id = \"{}\"", device.home_id);
        let _ = writeln!(out, "node_id = \"{}\"", device.node_id);
        if let Some(ref name) = device.device_name {
            let _ = writeln!(out, "device_name = \"{name}\"");
        }
    }

    out
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", virtus_config::config_path().display());
            Ok(())
        }
        ConfigCommand::Show => {
            let cfg = virtus_config::load_config().map_err(config_err)?;
            print!("{}", format_config_redacted(&cfg));
            Ok(())
        }
        ConfigCommand::SetPassword => set_password(global),
        ConfigCommand::Init => init(global).await,
    }
}

fn set_password(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = virtus_config::load_config().map_err(config_err)?;
    let username = global
        .username
        .clone()
        .or_else(|| cfg.device.as_ref().map(|d| d.username.clone()))
        .ok_or(CliError::NoDevice)?;

    let password = rpassword::prompt_password(format!("Enki password for {username}: "))?;
    virtus_config::store_password(&username, &password).map_err(config_err)?;
    println!("password stored in the OS keyring for {username}");
    Ok(())
}

async fn init(global: &GlobalOpts) -> Result<(), CliError> {
    // Credentials: flags first, prompts for the rest.
    let username = match global.username.clone() {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Enki username (email)")
            .interact_text()
            .map_err(|e| interactive_err(&e))?,
    };
    let password = match global.password.clone() {
        Some(p) => p,
        None => rpassword::prompt_password("Enki password: ")?,
    };
    let home_id = match global.home_id.clone() {
        Some(h) => h,
        None => Input::new()
            .with_prompt("Home id (from the Enki app settings)")
            .interact_text()
            .map_err(|e| interactive_err(&e))?,
    };

    // Discover the air conditioners in the home. This also validates
    // the credentials -- discovery authenticates on first use.
    let probe = Device::new(DeviceConfig::new(
        username.clone(),
        password.clone().into(),
        home_id.clone(),
        "",
        "AC",
    ))?;
    let devices = probe.discover().await?;

    if devices.is_empty() {
        return Err(CliError::Interactive {
            message: format!("no air conditioners found in home {home_id}"),
        });
    }

    let labels: Vec<String> = devices
        .iter()
        .map(|d| format!("{} ({})", d.label, d.node_id))
        .collect();
    let picked = if devices.len() == 1 {
        0
    } else {
        Select::new()
            .with_prompt("Select a device")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| interactive_err(&e))?
    };
    let device = &devices[picked];

    // Password storage: keyring by default, plaintext on request.
    let use_keyring = Confirm::new()
        .with_prompt("Store the password in the OS keyring?")
        .default(true)
        .interact()
        .map_err(|e| interactive_err(&e))?;
    if use_keyring {
        virtus_config::store_password(&username, &password).map_err(config_err)?;
    }

    let cfg = Config {
        device: Some(DeviceSection {
            username,
            password: (!use_keyring).then_some(password),
            password_env: None,
            home_id,
            node_id: device.node_id.clone(),
            device_name: Some(device.label.clone()),
        }),
        ..Config::default()
    };

    let path = virtus_config::save_config(&cfg).map_err(config_err)?;
    println!("configured {} -- wrote {}", device.label, path.display());
    Ok(())
}
