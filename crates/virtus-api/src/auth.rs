// Token lifecycle against the Enki Keycloak realm.
//
// Password and refresh-token grants, form-encoded. Tokens live behind a
// single async mutex on the client; every exchange happens with the lock
// held, so concurrent operations on an expired token trigger exactly one
// refresh. Expiry carries a 60 s safety margin against clock skew between
// us and the token server.

use std::time::{Duration, Instant};

use secrecy::ExposeSecret;
use tracing::{debug, warn};

use crate::client::{CLIENT_ID, VirtusClient};
use crate::error::Error;
use crate::models::TokenResponse;

/// Safety margin subtracted from the server-declared token lifetime.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Current credential material. Created at authentication, replaced
/// wholesale at each refresh, dropped with the client.
#[derive(Debug, Default)]
pub(crate) struct TokenState {
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub expires_at: Option<Instant>,
}

impl TokenState {
    pub(crate) fn seed(access: Option<String>, refresh: Option<String>) -> Self {
        // A seeded access token has an unknown lifetime; leaving
        // `expires_at` unset makes the first expiry check refresh it.
        let expires_at = access.as_ref().map(|_| Instant::now());
        Self {
            access,
            refresh,
            expires_at,
        }
    }

    fn expired(&self) -> bool {
        self.expires_at.is_none_or(|at| Instant::now() >= at)
    }

    fn store(&mut self, response: TokenResponse) {
        let lifetime =
            Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        self.access = Some(response.access_token);
        self.refresh = Some(response.refresh_token);
        self.expires_at = Some(Instant::now() + lifetime);
    }
}

impl VirtusClient {
    /// Authenticate with username and password.
    ///
    /// Fails without a network call when either credential is absent.
    /// On success the client holds a fresh access/refresh token pair.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let mut tokens = self.tokens().lock().await;
        self.password_grant(&mut tokens).await
    }

    /// Exchange the held refresh token for a new token pair.
    ///
    /// Falls back to a full password login when no refresh token is held
    /// or when the exchange is rejected -- refresh-token exhaustion is
    /// recoverable and never surfaces as a distinct error.
    pub async fn refresh_access_token(&self) -> Result<(), Error> {
        let mut tokens = self.tokens().lock().await;
        self.refresh_grant(&mut tokens).await
    }

    /// Precondition check used by every remote operation: authenticate if
    /// no token is held, refresh if it has expired, otherwise return the
    /// current access token without any network call.
    pub(crate) async fn ensure_token_valid(&self) -> Result<String, Error> {
        let mut tokens = self.tokens().lock().await;

        if tokens.access.is_none() {
            self.password_grant(&mut tokens).await?;
        } else if tokens.expired() {
            self.refresh_grant(&mut tokens).await?;
        }

        tokens.access.clone().ok_or(Error::Authentication {
            message: "no access token after login".into(),
        })
    }

    async fn password_grant(&self, tokens: &mut TokenState) -> Result<(), Error> {
        let (Some(username), Some(password)) = (self.username(), self.password()) else {
            return Err(Error::MissingCredentials);
        };

        debug!("requesting password grant at {}", self.token_url());

        let form = [
            ("grant_type", "password"),
            ("client_id", CLIENT_ID),
            ("username", username),
            ("password", password.expose_secret()),
        ];
        let resp = self
            .http()
            .post(self.token_url().clone())
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Authentication {
                message: format!("token endpoint returned HTTP {status}"),
            });
        }

        let response: TokenResponse = resp.json().await.map_err(Error::Transport)?;
        tokens.store(response);
        debug!("password grant successful");
        Ok(())
    }

    async fn refresh_grant(&self, tokens: &mut TokenState) -> Result<(), Error> {
        let Some(refresh) = tokens.refresh.clone() else {
            // Nothing to exchange -- full re-login.
            return self.password_grant(tokens).await;
        };

        debug!("refreshing access token at {}", self.token_url());

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", CLIENT_ID),
            ("refresh_token", refresh.as_str()),
        ];
        let resp = self
            .http()
            .post(self.token_url().clone())
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            warn!("token refresh failed (HTTP {status}), re-authenticating");
            return self.password_grant(tokens).await;
        }

        let response: TokenResponse = resp.json().await.map_err(Error::Transport)?;
        tokens.store(response);
        debug!("token refresh successful");
        Ok(())
    }

    // ── Token accessors ──────────────────────────────────────────────

    /// The current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens().lock().await.access.clone()
    }

    /// The current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens().lock().await.refresh.clone()
    }

    /// Remaining validity of the held access token (margin already
    /// applied), or `None` when no token is held.
    pub async fn token_valid_for(&self) -> Option<Duration> {
        self.tokens()
            .lock()
            .await
            .expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}
