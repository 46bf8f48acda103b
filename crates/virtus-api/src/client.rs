// Enki cloud HTTP client
//
// Wraps `reqwest::Client` with Enki-specific URL construction and the
// gateway header set (per-service API key, bearer token, home id). Token
// exchange lives in `auth.rs` as inherent methods; this module owns the
// four remote operations: read state, write state, read error, describe/
// discover nodes.

use reqwest::{Method, StatusCode};
use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::auth::TokenState;
use crate::error::Error;
use crate::models::{
    AcState, Dashboard, DiscoveredDevice, NodeInfo, StateChange, StateEnvelope, WritePayload,
};
use crate::transport::TransportConfig;

/// Production Enki API gateway.
pub const BASE_URL: &str = "https://enki.api.devportal.adeo.cloud";

/// Production Keycloak token endpoint for the `enki` realm.
pub const TOKEN_URL: &str =
    "https://keycloak-prod.iot.leroymerlin.fr/realms/enki/protocol/openid-connect/token";

/// OAuth client id of the Enki front end, reused here.
pub(crate) const CLIENT_ID: &str = "enki-front";

/// Gateway key for the equation-airco service (state read/write/error).
const API_KEY_AIRCO: &str = "Nntj37xS5lih1qqFy8SbyHWKG5NEhSCm";

/// Gateway key for the node-aggregation and dashboard services.
const API_KEY_NODE: &str = "UBb0Kv6xXpG6bOvD8VZ9A63uxqQ4G1A3";

/// Dashboard category marker identifying air-conditioner nodes.
pub const AC_ICON: &str = "air_conditioners";

pub(crate) const USER_AGENT: &str = "virtus/0.1";

/// Connection parameters for a [`VirtusClient`].
///
/// `base_url` / `token_url` default to the production endpoints and exist
/// as fields so tests can point the client at a mock server. Tokens may be
/// seeded from a previous session; they are otherwise obtained lazily on
/// the first operation.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub token_url: Url,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub home_id: Option<String>,
    pub node_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("static base URL"),
            token_url: Url::parse(TOKEN_URL).expect("static token URL"),
            username: None,
            password: None,
            access_token: None,
            refresh_token: None,
            home_id: None,
            node_id: None,
        }
    }
}

/// Authenticated client for one Equation Virtus device behind the Enki
/// cloud.
///
/// Owns the credential lifecycle and the four remote operations. The
/// transport session is shared and reused across all calls; every public
/// operation starts with a token-validity check and returns a plain
/// `Result` -- no failure escapes this boundary as a panic.
pub struct VirtusClient {
    http: reqwest::Client,
    base_url: Url,
    token_url: Url,
    username: Option<String>,
    password: Option<SecretString>,
    home_id: Option<String>,
    node_id: Option<String>,
    tokens: Mutex<TokenState>,
}

impl VirtusClient {
    /// Create a client with a transport session built from `transport`.
    pub fn new(config: ClientConfig, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, config))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// Use this to share one transport session across components.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url,
            token_url: config.token_url,
            username: config.username,
            password: config.password,
            home_id: config.home_id,
            node_id: config.node_id,
            tokens: Mutex::new(TokenState::seed(config.access_token, config.refresh_token)),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub(crate) fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub(crate) fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    pub(crate) fn tokens(&self) -> &Mutex<TokenState> {
        &self.tokens
    }

    /// The configured home id, if any.
    pub fn home_id(&self) -> Option<&str> {
        self.home_id.as_deref()
    }

    /// The configured node id, if any.
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn airco_url(&self, node_id: &str, operation: &str) -> Result<Url, Error> {
        let path =
            format!("/api-enki-equation-airco-prod/v1/equation-airco/{node_id}/{operation}");
        Ok(self.base_url.join(&path)?)
    }

    fn node_url(&self, node_id: &str) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("/api-enki-node-agg-prod/v1/nodes/{node_id}"))?)
    }

    fn dashboard_url(&self, home_id: &str) -> Result<Url, Error> {
        let mut url = self
            .base_url
            .join(&format!("/api-enki-mobile-bff-prod/v1/dashboard/homes/{home_id}"))?;
        url.set_query(Some("hasGroups=true"));
        Ok(url)
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Start a request carrying the full gateway header set.
    fn request(
        &self,
        method: Method,
        url: Url,
        api_key: &'static str,
        bearer: &str,
    ) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header("x-gateway-apikey", api_key)
            .header("authorization", format!("Bearer {bearer}"))
            .header("content-type", "application/json; charset=utf-8");
        if let Some(home_id) = self.home_id.as_deref() {
            builder = builder.header("homeid", home_id);
        }
        builder
    }

    fn require_node_id(&self) -> Result<&str, Error> {
        self.node_id.as_deref().ok_or(Error::MissingNodeId)
    }

    // ── Remote operations ────────────────────────────────────────────

    /// Read the device's last reported state.
    ///
    /// Any missing field in the response invalidates the whole snapshot;
    /// there is no partially populated result.
    pub async fn get_state(&self) -> Result<AcState, Error> {
        let bearer = self.ensure_token_valid().await?;
        let node_id = self.require_node_id()?;
        let url = self.airco_url(node_id, "check-airconditioner-state")?;

        debug!("GET {url}");

        let resp = self
            .request(Method::GET, url, API_KEY_AIRCO, &bearer)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: StateEnvelope =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        Ok(AcState::from(envelope))
    }

    /// Write a (partial) state change.
    ///
    /// The wire body always carries every field -- see [`StateChange`]
    /// for the defaulting rules. The remote acknowledges with HTTP 202;
    /// any other status means the command had no effect.
    pub async fn set_state(&self, change: &StateChange) -> Result<(), Error> {
        let bearer = self.ensure_token_valid().await?;
        let node_id = self.require_node_id()?;
        let url = self.airco_url(node_id, "change-airconditioner-state")?;

        debug!("POST {url}");

        let resp = self
            .request(Method::POST, url, API_KEY_AIRCO, &bearer)
            .json(&WritePayload::from(change))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == StatusCode::ACCEPTED {
            Ok(())
        } else {
            Err(Error::WriteRejected {
                status: status.as_u16(),
            })
        }
    }

    /// Read the device's error report. Opaque passthrough -- the payload
    /// is surfaced as-is without interpretation.
    pub async fn get_error(&self) -> Result<serde_json::Value, Error> {
        let bearer = self.ensure_token_valid().await?;
        let node_id = self.require_node_id()?;
        let url = self.airco_url(node_id, "check-airconditioner-error")?;

        debug!("GET {url}");

        let resp = self
            .request(Method::GET, url, API_KEY_AIRCO, &bearer)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }
        resp.json().await.map_err(Error::Transport)
    }

    /// Fetch device metadata from the node-aggregation service.
    pub async fn node_info(&self) -> Result<NodeInfo, Error> {
        let bearer = self.ensure_token_valid().await?;
        let node_id = self.require_node_id()?;
        let url = self.node_url(node_id)?;

        debug!("GET {url}");

        let resp = self
            .request(Method::GET, url, API_KEY_NODE, &bearer)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// List the air-conditioner nodes in the configured home.
    ///
    /// Filters the home dashboard by the air-conditioner category marker.
    /// An absent home id or a dashboard with no matching nodes yields an
    /// empty list, not a failure.
    pub async fn discover_devices(&self) -> Result<Vec<DiscoveredDevice>, Error> {
        let bearer = self.ensure_token_valid().await?;
        let Some(home_id) = self.home_id.as_deref() else {
            debug!("home id not set, skipping discovery");
            return Ok(Vec::new());
        };
        let url = self.dashboard_url(home_id)?;

        debug!("GET {url}");

        let resp = self
            .request(Method::GET, url, API_KEY_NODE, &bearer)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let dashboard: Dashboard =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        Ok(dashboard
            .nodes
            .into_iter()
            .filter(|node| node.icon.as_deref() == Some(AC_ICON))
            .map(|node| DiscoveredDevice {
                node_id: node.id,
                label: node.label.unwrap_or_else(|| "AC".to_owned()),
                icon: AC_ICON.to_owned(),
            })
            .collect())
    }
}
