//! Content fetcher
//!
//! Retrieves the bytes of selected entries and embeds them as MIME-tagged
//! data URLs. One entry's failure never aborts the batch: every fetch
//! resolves to a [`FetchedImage`], degraded or not.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Upper bound on an embedded image payload. The selection limit keeps the
/// batch small, but a single oversized original must not balloon the
/// response.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;

/// MIME type derived from a file name's extension.
///
/// Total over all inputs: unrecognized extensions fall back to JPEG, which
/// matches what the gallery renders for unknown content anyway.
pub fn mime_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Reject payloads larger than this instead of embedding them
    pub max_image_bytes: usize,

    /// Per-download timeout
    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Result of fetching one selected entry.
///
/// Degraded entries carry an empty `data_url` and an error description; the
/// caller keeps them in the batch so output order always matches selection
/// order.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub data_url: String,
    pub error: Option<String>,
}

impl FetchedImage {
    fn degraded(error: impl Into<String>) -> Self {
        Self {
            data_url: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Downloads selected entries and embeds them for transport
pub struct ContentFetcher {
    http_client: Arc<dyn HttpClient>,
    config: FetcherConfig,
}

impl ContentFetcher {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_config(http_client, FetcherConfig::default())
    }

    pub fn with_config(http_client: Arc<dyn HttpClient>, config: FetcherConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Fetch one entry's content and embed it as a data URL.
    ///
    /// Never fails: every error is captured as a degraded result so the
    /// batch contract (one result per selected entry) holds.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn fetch(&self, locator: &str, name: &str) -> FetchedImage {
        let request = HttpRequest::new(HttpMethod::Get, locator)
            .timeout(self.config.request_timeout);

        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Download failed for {}: {}", name, e);
                return FetchedImage::degraded(e.to_string());
            }
        };

        if !response.is_success() {
            warn!(
                "Download of {} returned status {}",
                name, response.status
            );
            return FetchedImage::degraded(format!(
                "download failed with status {}",
                response.status
            ));
        }

        if response.body.len() > self.config.max_image_bytes {
            warn!(
                "Image {} is {} bytes, over the {} byte embed cap",
                name,
                response.body.len(),
                self.config.max_image_bytes
            );
            return FetchedImage::degraded(format!(
                "image exceeds the {} byte embed limit",
                self.config.max_image_bytes
            ));
        }

        let mime_type = mime_type_for(name);
        let encoded = BASE64.encode(&response.body);
        debug!("Embedded {} bytes as {}", response.body.len(), mime_type);

        FetchedImage {
            data_url: format!("data:{};base64,{}", mime_type, encoded),
            error: None,
        }
    }
}
