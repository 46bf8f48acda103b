use thiserror::Error;

/// Top-level error type for the `virtus-api` crate.
///
/// Every public client operation returns a `Result` with this type --
/// no panic and no raw `reqwest` error ever crosses the crate boundary.
/// `virtus-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token endpoint rejected the credentials or the exchange failed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Username/password missing -- login cannot even be attempted.
    #[error("Username and password are required for login")]
    MissingCredentials,

    // ── Preconditions ───────────────────────────────────────────────
    /// Node id required by the operation but not configured.
    #[error("Node id not set")]
    MissingNodeId,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Remote API ──────────────────────────────────────────────────
    /// The gateway answered with an unexpected status on a read.
    #[error("API error (HTTP {status})")]
    Api { status: u16 },

    /// A state write was not acknowledged with HTTP 202 -- the command
    /// had no effect and the caller must not assume the state changed.
    #[error("Write rejected (HTTP {status})")]
    WriteRejected { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// A response body was missing an expected field or otherwise
    /// malformed. The whole result is invalid; nothing is partially
    /// populated. Raw body kept for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::MissingCredentials
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
