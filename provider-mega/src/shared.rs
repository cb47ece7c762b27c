//! Shared-link resolver
//!
//! Public folder access without any stored credential: a folder reference is
//! an address of the shape `https://mega.nz/folder/<handle>` plus an
//! out-of-band capability key carried in the URL fragment (or supplied
//! separately when the fragment was stripped in transit).

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

use crate::error::{MegaError, Result};
use crate::selection::select_latest_images;
use crate::types::{PublicFolderResponse, RemoteEntry, SelectedImage};

/// Path marker every public folder reference must carry
const FOLDER_PATH_MARKER: &str = "folder";

/// Hosts a public folder reference may point at
const SHARED_LINK_HOSTS: [&str; 2] = ["mega.nz", "www.mega.nz"];

/// A parsed public folder reference: handle plus capability key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFolderRef {
    pub handle: String,
    pub key: String,
}

/// Resolver for public shared-folder links
pub struct SharedLinkResolver {
    /// HTTP client for gateway requests
    http_client: Arc<dyn HttpClient>,

    /// Gateway base URL
    base_url: String,
}

impl SharedLinkResolver {
    /// Create a resolver against the default gateway
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http_client, crate::connector::DEFAULT_GATEWAY_BASE)
    }

    /// Create a resolver against a custom gateway base URL
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Parse a public folder address into a [`SharedFolderRef`].
    ///
    /// The capability key is taken from the URL fragment when present, else
    /// from `secret_fragment` (links often lose their fragment when relayed
    /// through query parameters).
    ///
    /// # Errors
    ///
    /// - [`MegaError::InvalidLink`] when the host is not a recognized
    ///   shared-link host or the address does not match the
    ///   folder-reference shape
    /// - [`MegaError::MissingSecret`] when no key is found in either place
    pub fn parse(address: &str, secret_fragment: Option<&str>) -> Result<SharedFolderRef> {
        let url =
            Url::parse(address).map_err(|_| MegaError::InvalidLink(address.to_string()))?;

        match url.host_str() {
            Some(host) if SHARED_LINK_HOSTS.contains(&host) => {}
            _ => return Err(MegaError::InvalidLink(address.to_string())),
        }

        let mut segments = url
            .path_segments()
            .ok_or_else(|| MegaError::InvalidLink(address.to_string()))?;

        let handle = match (segments.next(), segments.next()) {
            (Some(FOLDER_PATH_MARKER), Some(handle)) if !handle.is_empty() => handle.to_string(),
            _ => return Err(MegaError::InvalidLink(address.to_string())),
        };

        let key = url
            .fragment()
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .or_else(|| {
                secret_fragment
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
            })
            .ok_or(MegaError::MissingSecret)?;

        Ok(SharedFolderRef { handle, key })
    }

    /// List the most recent images of a public folder, selection policy
    /// applied. Requires no prior connect.
    ///
    /// # Errors
    ///
    /// - [`MegaError::NotFound`] when the reference addresses a single file
    ///   rather than a directory, or the folder no longer resolves
    /// - [`MegaError::EmptyFolder`] when zero qualifying image entries remain
    #[instrument(skip(self, folder), fields(handle = %folder.handle, limit = limit))]
    pub async fn list(
        &self,
        folder: &SharedFolderRef,
        limit: usize,
    ) -> Result<Vec<SelectedImage>> {
        let url = format!(
            "{}/public/folders/{}?key={}",
            self.base_url,
            urlencoding::encode(&folder.handle),
            urlencoding::encode(&folder.key)
        );
        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(30));

        let response = self.http_client.execute(request).await?;

        if response.status == 404 {
            return Err(MegaError::NotFound(folder.handle.clone()));
        }
        if !response.is_success() {
            return Err(MegaError::Api {
                status_code: response.status,
                code: "EUNKNOWN".to_string(),
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let listing: PublicFolderResponse = response
            .json()
            .map_err(|e| MegaError::Parse(format!("public folder: {}", e)))?;

        // A link to a single file cannot be listed as a folder
        let Some(children) = listing.children else {
            return Err(MegaError::NotFound(format!(
                "{} addresses a single file, not a directory",
                folder.handle
            )));
        };

        let entries: Vec<RemoteEntry> = children.into_iter().map(|n| n.into_entry()).collect();
        let selected = select_latest_images(&entries, limit);

        if selected.is_empty() {
            return Err(MegaError::EmptyFolder);
        }

        info!(
            "Listed {} entries, selected {} images",
            entries.len(),
            selected.len()
        );

        Ok(selected)
    }

    /// Derive the content locator for one selected entry of a public folder.
    ///
    /// Public downloads are addressed directly under the folder handle, so
    /// no per-entry gateway round trip is needed.
    pub fn content_locator(&self, folder: &SharedFolderRef, entry: &RemoteEntry) -> String {
        format!(
            "{}/public/folders/{}/files/{}?key={}",
            self.base_url,
            urlencoding::encode(&folder.handle),
            urlencoding::encode(&entry.node_id),
            urlencoding::encode(&folder.key)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait::async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse>;
        }
    }

    fn json_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.as_bytes().to_vec()),
        }
    }

    #[test]
    fn test_parse_link_with_fragment() {
        let folder =
            SharedLinkResolver::parse("https://mega.nz/folder/AbC123#keyMaterial", None).unwrap();

        assert_eq!(folder.handle, "AbC123");
        assert_eq!(folder.key, "keyMaterial");
    }

    #[test]
    fn test_parse_link_with_separate_secret() {
        let folder =
            SharedLinkResolver::parse("https://mega.nz/folder/AbC123", Some("sideKey")).unwrap();

        assert_eq!(folder.key, "sideKey");
    }

    #[test]
    fn test_parse_fragment_wins_over_separate_secret() {
        let folder =
            SharedLinkResolver::parse("https://mega.nz/folder/AbC123#inline", Some("side"))
                .unwrap();

        assert_eq!(folder.key, "inline");
    }

    #[test]
    fn test_parse_missing_secret() {
        let result = SharedLinkResolver::parse("https://mega.nz/folder/AbC123", None);

        assert!(matches!(result, Err(MegaError::MissingSecret)));
    }

    #[test]
    fn test_parse_invalid_shape() {
        for address in [
            "https://mega.nz/file/AbC123#key",
            "https://mega.nz/",
            "not a url at all",
        ] {
            let result = SharedLinkResolver::parse(address, Some("key"));
            assert!(
                matches!(result, Err(MegaError::InvalidLink(_))),
                "expected InvalidLink for {}",
                address
            );
        }
    }

    #[test]
    fn test_parse_rejects_foreign_hosts() {
        for address in [
            "https://evil.test/folder/AbC123#key",
            "https://mega.nz.evil.test/folder/AbC123#key",
            "file:///folder/AbC123#key",
        ] {
            let result = SharedLinkResolver::parse(address, None);
            assert!(
                matches!(result, Err(MegaError::InvalidLink(_))),
                "expected InvalidLink for {}",
                address
            );
        }

        // www prefix is part of the recognized shape
        let folder =
            SharedLinkResolver::parse("https://www.mega.nz/folder/AbC123#key", None).unwrap();
        assert_eq!(folder.handle, "AbC123");
    }

    #[tokio::test]
    async fn test_list_selects_and_ranks() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("/public/folders/AbC123"));
            assert!(req.url.contains("key=secret"));
            Ok(json_response(
                200,
                r#"{
                    "node": {"id": "AbC123", "name": "Wedding", "directory": true},
                    "children": [
                        {"id": "n1", "name": "one.jpg", "size": 10, "timestamp": 100, "downloadId": "d1"},
                        {"id": "n2", "name": "two.jpg", "size": 10, "timestamp": 300, "downloadId": "d2"},
                        {"id": "n3", "name": "three.jpg", "size": 10, "timestamp": 200, "downloadId": "d3"}
                    ]
                }"#,
            ))
        });

        let resolver =
            SharedLinkResolver::with_base_url(Arc::new(mock_http), "https://gw.test/v1");
        let folder = SharedFolderRef {
            handle: "AbC123".to_string(),
            key: "secret".to_string(),
        };
        let images = resolver.list(&folder, 2).await.unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].entry.name, "two.jpg");
        assert_eq!(images[1].entry.name, "three.jpg");
    }

    #[tokio::test]
    async fn test_list_single_file_link() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{"node": {"id": "f1", "name": "single.jpg", "size": 10}}"#,
            ))
        });

        let resolver =
            SharedLinkResolver::with_base_url(Arc::new(mock_http), "https://gw.test/v1");
        let folder = SharedFolderRef {
            handle: "f1".to_string(),
            key: "k".to_string(),
        };
        let result = resolver.list(&folder, 2).await;

        assert!(matches!(result, Err(MegaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_empty_folder() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                200,
                r#"{
                    "node": {"id": "AbC123", "name": "Docs", "directory": true},
                    "children": [
                        {"id": "n1", "name": "notes.txt", "size": 10, "timestamp": 100, "downloadId": "d1"}
                    ]
                }"#,
            ))
        });

        let resolver =
            SharedLinkResolver::with_base_url(Arc::new(mock_http), "https://gw.test/v1");
        let folder = SharedFolderRef {
            handle: "AbC123".to_string(),
            key: "k".to_string(),
        };
        let result = resolver.list(&folder, 2).await;

        assert!(matches!(result, Err(MegaError::EmptyFolder)));
    }

    #[tokio::test]
    async fn test_list_folder_gone() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(404, r#"{"code": "ENOTFOUND"}"#)));

        let resolver =
            SharedLinkResolver::with_base_url(Arc::new(mock_http), "https://gw.test/v1");
        let folder = SharedFolderRef {
            handle: "gone".to_string(),
            key: "k".to_string(),
        };
        let result = resolver.list(&folder, 2).await;

        assert!(matches!(result, Err(MegaError::NotFound(_))));
    }

    #[test]
    fn test_content_locator_shape() {
        let resolver = SharedLinkResolver::with_base_url(
            Arc::new(MockHttpClient::new()),
            "https://gw.test/v1",
        );
        let folder = SharedFolderRef {
            handle: "AbC123".to_string(),
            key: "se cret".to_string(),
        };
        let entry = RemoteEntry {
            node_id: "n1".to_string(),
            name: "one.jpg".to_string(),
            size: 10,
            timestamp: Some(100),
            download_id: "d1".to_string(),
            directory: false,
        };

        let locator = resolver.content_locator(&folder, &entry);

        assert_eq!(
            locator,
            "https://gw.test/v1/public/folders/AbC123/files/n1?key=se%20cret"
        );
    }
}
