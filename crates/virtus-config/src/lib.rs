//! Shared configuration for the virtus CLI.
//!
//! TOML config file, credential resolution (env var + keyring +
//! plaintext fallback), and translation to `virtus_core::DeviceConfig`.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use virtus_core::DeviceConfig;

/// Keyring service name for stored passwords.
const KEYRING_SERVICE: &str = "virtus";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no device configured -- run `virtus config init` first")]
    NoDevice,

    #[error("no password available for '{username}' (env, keyring, or config)")]
    NoCredentials { username: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// The configured device, if any.
    pub device: Option<DeviceSection>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Poll interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            poll_interval: default_poll_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_poll_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    30
}

/// The configured air-conditioner node.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSection {
    /// Enki account username (email).
    pub username: String,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Home the node belongs to.
    pub home_id: String,

    /// The node to shadow.
    pub node_id: String,

    /// Display name, defaults to the discovered label.
    pub device_name: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "virtus-ac", "virtus").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("virtus");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// `VIRTUS_DEVICE__USERNAME`-style variables override file values; the
/// double underscore separates nesting levels.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit path (tests, `--config` overrides).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VIRTUS_").split("__"))
        .extract()?;
    Ok(config)
}

/// Write the config file, creating parent directories as needed.
pub fn save_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(config)?)?;
    Ok(path)
}

// ── Credential resolution ───────────────────────────────────────────

/// Store a password in the OS keyring for the given username.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, username)?.set_password(password)?;
    Ok(())
}

/// Remove a stored password from the OS keyring, ignoring absence.
pub fn clear_password(username: &str) -> Result<(), ConfigError> {
    match keyring::Entry::new(KEYRING_SERVICE, username)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn keyring_password(username: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, username)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Resolve the device password: named env var first, then the OS
/// keyring, then the plaintext config value.
fn resolve_password(device: &DeviceSection) -> Result<SecretString, ConfigError> {
    if let Some(var) = device.password_env.as_deref() {
        if let Ok(value) = std::env::var(var) {
            return Ok(value.into());
        }
    }
    if let Some(value) = keyring_password(&device.username) {
        return Ok(value.into());
    }
    if let Some(value) = device.password.clone() {
        return Ok(value.into());
    }
    Err(ConfigError::NoCredentials {
        username: device.username.clone(),
    })
}

/// Build the core `DeviceConfig` from a loaded `Config`.
pub fn resolve_device(config: &Config) -> Result<DeviceConfig, ConfigError> {
    let device = config.device.as_ref().ok_or(ConfigError::NoDevice)?;

    if device.username.is_empty() {
        return Err(ConfigError::Validation {
            field: "device.username".into(),
            reason: "must not be empty".into(),
        });
    }
    if device.home_id.is_empty() {
        return Err(ConfigError::Validation {
            field: "device.home_id".into(),
            reason: "must not be empty".into(),
        });
    }

    let password = resolve_password(device)?;
    let name = device
        .device_name
        .clone()
        .unwrap_or_else(|| "AC".to_owned());

    Ok(DeviceConfig {
        username: device.username.clone(),
        password,
        home_id: device.home_id.clone(),
        node_id: device.node_id.clone(),
        device_name: name,
        poll_interval: Duration::from_secs(config.defaults.poll_interval),
        timeout: Duration::from_secs(config.defaults.timeout),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::{Config, ConfigError, DeviceSection, load_config_from, resolve_device};

    fn device_section() -> DeviceSection {
        DeviceSection {
            username: "user@example.com".into(),
            password: Some("hunter2".into()),
            password_env: None,
            home_id: "H1".into(),
            node_id: "N1".into(),
            device_name: Some("Living room AC".into()),
        }
    }

    #[test]
    fn load_round_trips_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[device]
username = "user@example.com"
password = "hunter2"
home_id = "H1"
node_id = "N1"

[defaults]
poll_interval = 15
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        let device = config.device.as_ref().unwrap();
        assert_eq!(device.username, "user@example.com");
        assert_eq!(device.node_id, "N1");
        assert_eq!(config.defaults.poll_interval, 15);
        // Unspecified defaults fill in.
        assert_eq!(config.defaults.output, "table");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config_from(std::path::Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.device.is_none());
        assert_eq!(config.defaults.timeout, 30);
    }

    #[test]
    fn resolve_requires_a_device() {
        let config = Config::default();
        assert!(matches!(
            resolve_device(&config),
            Err(ConfigError::NoDevice)
        ));
    }

    #[test]
    fn resolve_builds_device_config() {
        let config = Config {
            device: Some(device_section()),
            ..Config::default()
        };
        let device = resolve_device(&config).unwrap();
        assert_eq!(device.node_id, "N1");
        assert_eq!(device.device_name, "Living room AC");
        assert_eq!(device.poll_interval.as_secs(), 30);
    }

    #[test]
    fn resolve_rejects_empty_home_id() {
        let mut section = device_section();
        section.home_id = String::new();
        let config = Config {
            device: Some(section),
            ..Config::default()
        };
        assert!(matches!(
            resolve_device(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn unset_password_env_falls_back_to_plaintext() {
        let mut section = device_section();
        section.password_env = Some("VIRTUS_TEST_PASSWORD_UNSET".into());

        let config = Config {
            device: Some(section),
            ..Config::default()
        };
        let device = resolve_device(&config).unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(device.password.expose_secret(), "hunter2");
    }
}
