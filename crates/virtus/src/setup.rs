//! Glue between the config file, environment, CLI flags, and the core
//! `DeviceConfig`. CLI flags win over the environment, which wins over
//! the file.

use virtus_config::DeviceSection;
use virtus_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

fn empty_section() -> DeviceSection {
    DeviceSection {
        username: String::new(),
        password: None,
        password_env: None,
        home_id: String::new(),
        node_id: String::new(),
        device_name: None,
    }
}

/// Load and resolve the device configuration.
///
/// `require_node` is false for discovery, which only needs credentials
/// and a home id; everything else needs the node id too.
pub fn load_device_config(
    global: &GlobalOpts,
    require_node: bool,
) -> Result<DeviceConfig, CliError> {
    let path = virtus_config::config_path();
    let as_config_err = |source| CliError::Config {
        path: path.display().to_string(),
        source,
    };

    let mut config = virtus_config::load_config().map_err(as_config_err)?;

    let had_file_device = config.device.is_some();
    let mut section = config.device.take().unwrap_or_else(empty_section);
    if let Some(username) = &global.username {
        section.username = username.clone();
    }
    if let Some(password) = &global.password {
        section.password = Some(password.clone());
    }
    if let Some(home_id) = &global.home_id {
        section.home_id = home_id.clone();
    }
    if let Some(node_id) = &global.node_id {
        section.node_id = node_id.clone();
    }

    if !had_file_device && section.username.is_empty() {
        return Err(CliError::NoDevice);
    }
    if require_node && section.node_id.is_empty() {
        return Err(CliError::NoDevice);
    }

    config.device = Some(section);
    virtus_config::resolve_device(&config).map_err(as_config_err)
}
