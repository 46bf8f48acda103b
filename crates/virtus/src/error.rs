//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use virtus_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const UNAVAILABLE: i32 = 4;
    pub const REJECTED: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No device configured")]
    #[diagnostic(
        code(virtus::no_device),
        help(
            "Run: virtus config init\n\
             Or pass --username/--password/--home-id/--node-id explicitly."
        )
    )]
    NoDevice,

    #[error("Configuration error")]
    #[diagnostic(code(virtus::config), help("Config file: {path}"))]
    Config {
        path: String,
        #[source]
        source: virtus_config::ConfigError,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(virtus::auth_failed),
        help(
            "Verify your Enki username and password.\n\
             Run: virtus config set-password"
        )
    )]
    AuthFailed {
        #[source]
        source: CoreError,
    },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device state unavailable")]
    #[diagnostic(
        code(virtus::unavailable),
        help(
            "The Enki cloud did not return a state snapshot for this node.\n\
             Check the node id and your connectivity, then try again."
        )
    )]
    Unavailable {
        #[source]
        source: CoreError,
    },

    #[error("Command rejected by the device gateway")]
    #[diagnostic(
        code(virtus::rejected),
        help("The device did not accept the write; its state is unchanged.")
    )]
    Rejected {
        #[source]
        source: CoreError,
    },

    #[error("{message}")]
    #[diagnostic(code(virtus::invalid_value))]
    InvalidValue { message: String },

    // ── Catch-alls ───────────────────────────────────────────────────
    #[error("API error")]
    #[diagnostic(code(virtus::api))]
    Api {
        #[source]
        source: CoreError,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(virtus::io))]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    #[diagnostic(code(virtus::interactive))]
    Interactive { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoDevice | Self::Config { .. } => exit_code::USAGE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Unavailable { .. } => exit_code::UNAVAILABLE,
            Self::Rejected { .. } => exit_code::REJECTED,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { .. } => Self::AuthFailed { source: err },
            CoreError::UpdateFailed { .. } => Self::Unavailable { source: err },
            CoreError::WriteFailed { .. } => Self::Rejected { source: err },
            CoreError::InvalidValue { message } => Self::InvalidValue { message },
            other => Self::Api { source: other },
        }
    }
}
