// ── Core error types ──
//
// User-facing errors from virtus-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<virtus_api::Error>`
// impl translates transport-layer errors into domain-appropriate
// variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A state refresh failed. The previously held snapshot, if any,
    /// remains readable -- this signals staleness, not data loss.
    #[error("Update failed: {reason}")]
    UpdateFailed { reason: String },

    /// A state write was not accepted; the device state is unchanged.
    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("API error: {message}")]
    Api { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<virtus_api::Error> for CoreError {
    fn from(err: virtus_api::Error) -> Self {
        match err {
            virtus_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            virtus_api::Error::MissingCredentials => CoreError::AuthenticationFailed {
                message: "username and password are required".into(),
            },
            virtus_api::Error::MissingNodeId => CoreError::Config {
                message: "node id not set".into(),
            },
            virtus_api::Error::WriteRejected { status } => CoreError::WriteFailed {
                message: format!("device gateway answered HTTP {status} instead of 202"),
            },
            virtus_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            other => CoreError::Api {
                message: other.to_string(),
            },
        }
    }
}
