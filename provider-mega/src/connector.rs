//! Account-mode gateway connector
//!
//! Implements the authenticated half of the acquisition pipeline: establish
//! a session, list a folder with the selection policy applied, resolve
//! time-limited content locators, release the session.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{MegaError, Result};
use crate::selection::select_latest_images;
use crate::types::{
    FolderChildrenResponse, GatewayErrorBody, LinkResponse, LoginRequest, LoginResponse,
    RemoteEntry, SelectedImage,
};

/// Default storage gateway base URL
pub const DEFAULT_GATEWAY_BASE: &str = "https://g.api.mega.co.nz/v1";

/// Scope segment addressing the account's root folder
const ROOT_SCOPE: &str = "root";

/// Account credentials for establishing a gateway session
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Second-factor code, when the account has MFA enabled
    pub mfa_code: Option<String>,
}

/// An established gateway session.
///
/// Owned per request: the caller acquires it via [`MegaConnector::connect`],
/// uses it, and releases it via [`MegaConnector::disconnect`]. Once released
/// the token is gone and further calls fail with `NotConnected`.
#[derive(Debug)]
pub struct MegaSession {
    token: Option<String>,
}

impl MegaSession {
    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(MegaError::NotConnected)
    }
}

/// Account-mode storage gateway connector
///
/// # Example
///
/// ```ignore
/// use provider_mega::{Credentials, MegaConnector};
///
/// let connector = MegaConnector::new(http_client);
/// let mut session = connector.connect(&credentials).await?;
/// let images = connector.list_images(&session, None, 2).await?;
/// connector.disconnect(&mut session).await;
/// ```
pub struct MegaConnector {
    /// HTTP client for gateway requests
    http_client: Arc<dyn HttpClient>,

    /// Gateway base URL
    base_url: String,
}

impl MegaConnector {
    /// Create a connector against the default gateway
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http_client, DEFAULT_GATEWAY_BASE)
    }

    /// Create a connector against a custom gateway base URL
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Parse the error body of a non-2xx gateway response
    fn gateway_error(response: &HttpResponse) -> MegaError {
        let (code, message) = match response.json::<GatewayErrorBody>() {
            Ok(body) => (body.code, body.message),
            Err(_) => (
                "EUNKNOWN".to_string(),
                String::from_utf8_lossy(&response.body).to_string(),
            ),
        };

        MegaError::Api {
            status_code: response.status,
            code,
            message,
        }
    }

    /// Execute a gateway request with retry on rate limiting and 5xx
    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        max_retries: u32,
    ) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            match self.http_client.execute(request.clone()).await {
                Ok(response) => {
                    let status = response.status;

                    if response.is_success() {
                        debug!("Gateway request succeeded: status={}", status);
                        return Ok(response);
                    } else if status == 429 || response.is_server_error() {
                        attempt += 1;
                        if attempt >= max_retries {
                            warn!(
                                "Gateway request failed after {} attempts: status={}",
                                max_retries, status
                            );
                            return Err(Self::gateway_error(&response));
                        }

                        let backoff_ms = 100u64 * 2u64.pow(attempt);
                        warn!(
                            "Gateway request failed (attempt {}/{}): status={}, retrying in {}ms",
                            attempt, max_retries, status, backoff_ms
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    } else {
                        // Client error - don't retry
                        return Err(Self::gateway_error(&response));
                    }
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries {
                        warn!("Gateway request failed after {} attempts: {}", max_retries, e);
                        return Err(e.into());
                    }

                    let backoff_ms = 100u64 * 2u64.pow(attempt);
                    warn!(
                        "Gateway request failed (attempt {}/{}): {}, retrying in {}ms",
                        attempt, max_retries, e, backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    /// Establish an authenticated session.
    ///
    /// # Errors
    ///
    /// - [`MegaError::MfaRequired`] when the account needs a second factor
    ///   that was not supplied (gateway code `EMFA`)
    /// - [`MegaError::AuthenticationFailed`] on rejected credentials
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn connect(&self, credentials: &Credentials) -> Result<MegaSession> {
        info!("Connecting to storage gateway");

        let body = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            mfa_code: credentials.mfa_code.clone(),
        };

        let request = HttpRequest::new(HttpMethod::Post, format!("{}/session", self.base_url))
            .json(&body)?
            .timeout(Duration::from_secs(30));

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(match Self::gateway_error(&response) {
                MegaError::Api { code, .. } if code == "EMFA" => MegaError::MfaRequired,
                MegaError::Api { code, message, .. } => {
                    MegaError::AuthenticationFailed(format!("{}: {}", code, message))
                }
                other => other,
            });
        }

        let login: LoginResponse = response
            .json()
            .map_err(|e| MegaError::Parse(format!("login response: {}", e)))?;

        info!("Storage gateway session established");

        Ok(MegaSession {
            token: Some(login.session_id),
        })
    }

    /// List the most recent images of a folder, selection policy applied.
    ///
    /// `folder_scope` defaults to the account root. Fails with
    /// [`MegaError::InvalidScope`] when the scope does not resolve to a
    /// directory and [`MegaError::NotConnected`] when the session was
    /// already released.
    #[instrument(skip(self, session), fields(scope = ?folder_scope, limit = limit))]
    pub async fn list_images(
        &self,
        session: &MegaSession,
        folder_scope: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SelectedImage>> {
        let token = session.token()?;
        let scope = folder_scope.unwrap_or(ROOT_SCOPE);

        let url = format!(
            "{}/folders/{}/children",
            self.base_url,
            urlencoding::encode(scope)
        );
        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(token)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(30));

        let response = self.execute_with_retry(request, 3).await.map_err(|e| {
            match e {
                MegaError::Api { status_code: 404, .. } => MegaError::InvalidScope {
                    scope: scope.to_string(),
                },
                other => other,
            }
        })?;

        let listing: FolderChildrenResponse = response
            .json()
            .map_err(|e| MegaError::Parse(format!("folder listing: {}", e)))?;

        if !listing.parent.directory {
            return Err(MegaError::InvalidScope {
                scope: scope.to_string(),
            });
        }

        let entries: Vec<RemoteEntry> =
            listing.nodes.into_iter().map(|n| n.into_entry()).collect();
        let selected = select_latest_images(&entries, limit);

        info!(
            "Listed {} entries, selected {} images",
            entries.len(),
            selected.len()
        );

        Ok(selected)
    }

    /// Resolve a time-limited retrieval locator for one entry.
    ///
    /// Fails with [`MegaError::NotFound`] when the node no longer resolves.
    #[instrument(skip(self, session, entry), fields(node_id = %entry.node_id))]
    pub async fn resolve_content_locator(
        &self,
        session: &MegaSession,
        entry: &RemoteEntry,
    ) -> Result<String> {
        let token = session.token()?;

        let url = format!(
            "{}/nodes/{}/link?downloadId={}",
            self.base_url,
            urlencoding::encode(&entry.node_id),
            urlencoding::encode(&entry.download_id)
        );
        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(token)
            .timeout(Duration::from_secs(30));

        let response = self.execute_with_retry(request, 3).await.map_err(|e| {
            match e {
                MegaError::Api { status_code: 404, .. } => {
                    MegaError::NotFound(entry.node_id.clone())
                }
                other => other,
            }
        })?;

        let link: LinkResponse = response
            .json()
            .map_err(|e| MegaError::Parse(format!("link response: {}", e)))?;

        Ok(link.url)
    }

    /// Release the gateway session.
    ///
    /// Idempotent: releasing an already-released session is a no-op, and
    /// gateway-side logout failures are logged but not surfaced since the
    /// request is over either way.
    #[instrument(skip(self, session))]
    pub async fn disconnect(&self, session: &mut MegaSession) {
        let Some(token) = session.token.take() else {
            debug!("Session already released");
            return;
        };

        let request = HttpRequest::new(HttpMethod::Delete, format!("{}/session", self.base_url))
            .bearer_token(token)
            .timeout(Duration::from_secs(10));

        match self.http_client.execute(request).await {
            Ok(response) if response.is_success() => {
                info!("Storage gateway session released");
            }
            Ok(response) => {
                warn!("Gateway logout returned status {}", response.status);
            }
            Err(e) => {
                warn!("Gateway logout failed: {}", e);
            }
        }
    }
}
