//! Async client for the Enki cloud API controlling Equation Virtus air
//! conditioners.
//!
//! One [`VirtusClient`] shadows one physical device (a *node* in Enki
//! terms). It owns the Keycloak token lifecycle -- password login, refresh
//! with re-login fallback, expiry tracking with a safety margin -- and the
//! four remote operations:
//!
//! - [`get_state`](VirtusClient::get_state) -- the last reported state
//!   snapshot, all-or-nothing parsed
//! - [`set_state`](VirtusClient::set_state) -- a full-body state write,
//!   acknowledged with HTTP 202
//! - [`get_error`](VirtusClient::get_error) -- opaque diagnostic payload
//! - [`node_info`](VirtusClient::node_info) /
//!   [`discover_devices`](VirtusClient::discover_devices) -- device
//!   metadata and per-home discovery
//!
//! The polling cadence, cached snapshot, and UI-facing views live one
//! level up in `virtus-core`.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{AC_ICON, BASE_URL, ClientConfig, TOKEN_URL, VirtusClient};
pub use error::Error;
pub use models::{AcState, DiscoveredDevice, NodeInfo, StateChange, SwingOrientation};
pub use transport::TransportConfig;
