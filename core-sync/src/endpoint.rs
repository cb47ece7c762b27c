//! Sync endpoint service
//!
//! The stateless server-side request boundary. Each invocation runs the full
//! per-request state machine: validate the request, dispatch on the resolved
//! access mode, list the folder with the selection policy applied, fetch
//! every selected entry concurrently, and emit the normalized response.
//!
//! Account-mode sessions are acquired and released inside one invocation;
//! teardown runs on every exit path, including early classification errors.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use bridge_traits::http::HttpClient;
use core_runtime::config::{Credentials as ConfigCredentials, GalleryConfig, SyncMode};
use provider_mega::connector::{Credentials, MegaConnector, DEFAULT_GATEWAY_BASE};
use provider_mega::shared::SharedLinkResolver;
use provider_mega::types::SelectedImage;
use provider_mega::MegaError;

use crate::error::SyncFailure;
use crate::fetcher::{ContentFetcher, FetcherConfig};
use crate::layout::layout_for_rank;
use crate::response::{Provenance, SyncResponse, SyncedImage};

/// One sync request: the access mode chosen at config-resolution time plus
/// the selection limit.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub mode: SyncMode,
    pub limit: usize,
}

impl SyncRequest {
    /// Build a request from session configuration.
    ///
    /// Returns `None` when neither access mode resolves; no sync attempt is
    /// made in that case.
    pub fn from_config(config: &GalleryConfig) -> Option<Self> {
        config.resolve_mode().map(|mode| Self {
            mode,
            limit: config.limit,
        })
    }
}

/// Stateless sync endpoint service.
///
/// Holds no per-request state; every [`SyncService::sync`] invocation is
/// independent and acquires its own upstream resources.
pub struct SyncService {
    http_client: Arc<dyn HttpClient>,
    gateway_base: String,
    fetcher: ContentFetcher,
}

impl SyncService {
    /// Create a service against the default gateway
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_gateway(http_client, DEFAULT_GATEWAY_BASE)
    }

    /// Create a service against a custom gateway base URL
    pub fn with_gateway(http_client: Arc<dyn HttpClient>, gateway_base: impl Into<String>) -> Self {
        Self {
            fetcher: ContentFetcher::new(Arc::clone(&http_client)),
            http_client,
            gateway_base: gateway_base.into(),
        }
    }

    /// Override the fetcher configuration (embed cap, download timeout)
    pub fn with_fetcher_config(mut self, config: FetcherConfig) -> Self {
        self.fetcher = ContentFetcher::with_config(Arc::clone(&self.http_client), config);
        self
    }

    /// Run one sync request through the full pipeline.
    #[instrument(skip(self, request), fields(mode = %request.mode.tag(), limit = request.limit))]
    pub async fn sync(&self, request: &SyncRequest) -> Result<SyncResponse, SyncFailure> {
        if request.limit == 0 {
            return Err(SyncFailure::bad_request("selection limit must be at least 1"));
        }

        let response = match &request.mode {
            SyncMode::SharedLink {
                folder_url,
                key_fragment,
            } => {
                self.sync_shared(folder_url, key_fragment.as_deref(), request.limit)
                    .await?
            }
            SyncMode::Account(credentials) => {
                self.sync_account(credentials, request.limit).await?
            }
        };

        info!("Sync produced {} images", response.images.len());
        Ok(response)
    }

    /// Shared-link mode: parse the reference, list, fetch.
    async fn sync_shared(
        &self,
        folder_url: &str,
        key_fragment: Option<&str>,
        limit: usize,
    ) -> Result<SyncResponse, SyncFailure> {
        let folder = SharedLinkResolver::parse(folder_url, key_fragment)?;
        let resolver =
            SharedLinkResolver::with_base_url(Arc::clone(&self.http_client), &self.gateway_base);

        let selected = resolver.list(&folder, limit).await?;

        let fetches = selected.iter().map(|image| {
            let locator = resolver.content_locator(&folder, &image.entry);
            self.fetch_entry(image, Ok(locator))
        });
        let images = join_all(fetches).await;

        Ok(SyncResponse { images })
    }

    /// Account mode: one session per invocation, released on every path.
    async fn sync_account(
        &self,
        credentials: &ConfigCredentials,
        limit: usize,
    ) -> Result<SyncResponse, SyncFailure> {
        let connector =
            MegaConnector::with_base_url(Arc::clone(&self.http_client), &self.gateway_base);
        let provider_credentials = Credentials {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            mfa_code: credentials.mfa_code.clone(),
        };

        let mut session = connector.connect(&provider_credentials).await?;

        // The session must be released no matter how listing or locator
        // resolution turns out, so run them in an inner scope first.
        let outcome = async {
            let selected = connector
                .list_images(&session, credentials.folder_scope.as_deref(), limit)
                .await?;

            let locators = join_all(
                selected
                    .iter()
                    .map(|image| connector.resolve_content_locator(&session, &image.entry)),
            )
            .await;

            Ok::<_, MegaError>((selected, locators))
        }
        .await;

        connector.disconnect(&mut session).await;

        let (selected, locators) = outcome?;

        let fetches = selected.iter().zip(locators).map(|(image, locator)| {
            // A failed locator resolution degrades this entry only
            let locator = locator.map_err(|e| {
                warn!("Locator resolution failed for {}: {}", image.entry.name, e);
                e.to_string()
            });
            self.fetch_entry(image, locator)
        });
        let images = join_all(fetches).await;

        Ok(SyncResponse { images })
    }

    /// Fetch one selected entry and shape it for the wire, preserving its
    /// selection rank whether or not retrieval succeeded.
    async fn fetch_entry(
        &self,
        image: &SelectedImage,
        locator: Result<String, String>,
    ) -> SyncedImage {
        let (download_url, error) = match locator {
            Ok(locator) => {
                let fetched = self.fetcher.fetch(&locator, &image.entry.name).await;
                (fetched.data_url, fetched.error)
            }
            Err(reason) => (String::new(), Some(reason)),
        };

        let hints = layout_for_rank(image.rank);

        SyncedImage {
            id: format!("mega-{}", image.rank + 1),
            name: image.entry.name.clone(),
            file_size: image.entry.size,
            timestamp: image.entry.timestamp.unwrap_or(0),
            download_url,
            position: hints.position,
            x: hints.x,
            y: hints.y,
            size: hints.size,
            source: Provenance::Mega,
            error,
        }
    }
}
