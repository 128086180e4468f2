//! C5 — the OAuth2 client-credentials access-token lifecycle manager.
//!
//! Acquires a bearer token from the backend's auth endpoint, publishes it
//! into the shared [`BackendClient`], and schedules a single-shot refresh
//! timer that fires before the token expires (§4.4). Missing credentials or
//! a failed acquisition degrade the process to unauthenticated operation
//! rather than treating it as fatal (§7: "configuration missing ... not an
//! error per se").

use std::sync::Arc;
use std::time::Duration;

use kgraph_mcp_backend::types::OAuthTokenRequest;
use kgraph_mcp_backend::BackendClient;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::AuthError;

/// Five minutes, expressed in milliseconds — the refresh lead time for
/// tokens that live at least ten minutes (§4.4).
const MAX_REFRESH_LEAD_MS: u64 = 300_000;

/// Environment-sourced credentials (§6.3). Both must be present or OAuth is
/// skipped entirely (§8 B5).
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Reads `KG_OAUTH_CLIENT_ID` / `KG_OAUTH_CLIENT_SECRET`. Returns `None`
    /// unless *both* are set to a non-empty value — a partially configured
    /// pair is treated as absent (§8 B5), not a startup error.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("KG_OAUTH_CLIENT_ID").ok().filter(|s| !s.is_empty());
        let client_secret = std::env::var("KG_OAUTH_CLIENT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(Self {
                client_id,
                client_secret,
            }),
            _ => None,
        }
    }
}

/// Computes the refresh delay for a token with the given lifetime, per §4.4 / T6:
/// `expires_in_ms - min(300_000, expires_in_ms / 2)`.
pub fn refresh_delay_ms(expires_in_ms: u64) -> u64 {
    let lead = MAX_REFRESH_LEAD_MS.min(expires_in_ms / 2);
    expires_in_ms.saturating_sub(lead)
}

#[derive(Debug, Clone, Default)]
struct TokenState {
    token: Option<String>,
    expires_at: Option<std::time::SystemTime>,
}

/// Owns the token-refresh timer and the credentials used to (re)acquire a
/// token. One instance per process, constructed by C9 at startup.
pub struct TokenManager {
    backend: Arc<BackendClient>,
    credentials: Option<OAuthCredentials>,
    state: Mutex<TokenState>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl TokenManager {
    pub fn new(backend: Arc<BackendClient>, credentials: Option<OAuthCredentials>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            credentials,
            state: Mutex::new(TokenState::default()),
            refresh_task: Mutex::new(None),
        })
    }

    /// Attempts acquisition; on success publishes the token into the backend
    /// client and schedules the refresh timer. Never returns an error — a
    /// failure degrades to unauthenticated operation and is only logged.
    pub async fn initialize(self: &Arc<Self>) {
        let Some(creds) = self.credentials.clone() else {
            info!("no OAuth credentials configured, proceeding unauthenticated");
            return;
        };

        match self.acquire(&creds).await {
            Ok((token, expires_in)) => {
                self.publish(token, expires_in).await;
                self.schedule_refresh(creds, expires_in).await;
            }
            Err(err) => {
                error!(error = %err, "initial OAuth token acquisition failed, proceeding unauthenticated");
            }
        }
    }

    /// Cheap accessor mirroring the backend client's own bearer token, kept
    /// for callers that only have a `TokenManager` handle.
    pub async fn current_token(&self) -> Option<String> {
        self.backend.current_token().await
    }

    async fn acquire(&self, creds: &OAuthCredentials) -> Result<(String, u64), AuthError> {
        let req = OAuthTokenRequest::client_credentials(
            creds.client_id.clone(),
            creds.client_secret.clone(),
        );
        let resp = self
            .backend
            .get_oauth_token(req)
            .await
            .map_err(|e| AuthError::OAuthError {
                message: e.to_string(),
            })?;
        Ok((resp.access_token, resp.expires_in))
    }

    async fn publish(&self, token: String, expires_in_secs: u64) {
        let expires_at = std::time::SystemTime::now() + Duration::from_secs(expires_in_secs);
        {
            let mut state = self.state.lock().await;
            state.token = Some(token.clone());
            state.expires_at = Some(expires_at);
        }
        self.backend.set_bearer_token(Some(token)).await;
    }

    async fn schedule_refresh(self: &Arc<Self>, creds: OAuthCredentials, expires_in_secs: u64) {
        let delay = Duration::from_millis(refresh_delay_ms(expires_in_secs * 1000));
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.refresh(creds).await;
        });

        // Any previously scheduled timer is cancelled before the new one
        // replaces it (§4.4: "any pending timer is cancelled before a new
        // one is scheduled").
        let mut guard = self.refresh_task.lock().await;
        if let Some(old) = guard.replace(handle) {
            old.abort();
        }
    }

    async fn refresh(self: Arc<Self>, creds: OAuthCredentials) {
        match self.acquire(&creds).await {
            Ok((token, expires_in)) => {
                info!("OAuth token refreshed");
                self.publish(token, expires_in).await;
                self.schedule_refresh(creds, expires_in).await;
            }
            Err(err) => {
                warn!(
                    error = %err,
                    "OAuth token refresh failed, stale token retained until natural expiry"
                );
            }
        }
    }

    /// Cancels the pending refresh timer. Called by C9 on shutdown so the
    /// manager never holds the process open on its own (§4.4, §4.7 step 6).
    pub async fn shutdown(&self) {
        if let Some(task) = self.refresh_task.lock().await.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_delay_long_lived_token_is_five_minutes_early() {
        assert_eq!(refresh_delay_ms(600_000), 300_000);
        assert_eq!(refresh_delay_ms(3_600_000), 3_300_000);
    }

    #[test]
    fn refresh_delay_short_lived_token_is_halfway() {
        assert_eq!(refresh_delay_ms(200_000), 100_000);
        assert_eq!(refresh_delay_ms(0), 0);
    }

    #[test]
    fn partial_credentials_are_treated_as_absent() {
        // SAFETY: tests run single-threaded within this module's process;
        // no other test in this crate touches these two variables.
        std::env::remove_var("KG_OAUTH_CLIENT_ID");
        std::env::remove_var("KG_OAUTH_CLIENT_SECRET");
        std::env::set_var("KG_OAUTH_CLIENT_ID", "only-id");
        assert!(OAuthCredentials::from_env().is_none());
        std::env::remove_var("KG_OAUTH_CLIENT_ID");

        std::env::set_var("KG_OAUTH_CLIENT_SECRET", "only-secret");
        assert!(OAuthCredentials::from_env().is_none());
        std::env::remove_var("KG_OAUTH_CLIENT_SECRET");
    }

    #[test]
    fn both_credentials_present_is_recognized() {
        std::env::set_var("KG_OAUTH_CLIENT_ID", "id");
        std::env::set_var("KG_OAUTH_CLIENT_SECRET", "secret");
        let creds = OAuthCredentials::from_env().expect("both set");
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
        std::env::remove_var("KG_OAUTH_CLIENT_ID");
        std::env::remove_var("KG_OAUTH_CLIENT_SECRET");
    }
}
