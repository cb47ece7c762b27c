//! MEGA gateway response types and provider domain types
//!
//! Wire structures for deserializing storage-gateway responses, plus the
//! domain entries the rest of the pipeline works with.

use serde::{Deserialize, Serialize};

/// One node of a remote folder listing, as the rest of the pipeline sees it.
///
/// Never persisted; lives only for the duration of one sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Node identifier within the gateway namespace
    pub node_id: String,

    /// File or directory name
    pub name: String,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Upload timestamp in epoch seconds, when the gateway reported one
    pub timestamp: Option<i64>,

    /// Opaque handle needed to address the node's content later
    pub download_id: String,

    /// Whether the node is a directory
    pub directory: bool,
}

/// A [`RemoteEntry`] that survived the selection policy, with its recency
/// rank (0 = most recent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub entry: RemoteEntry,
    pub rank: usize,
}

/// Gateway login request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_code: Option<String>,
}

/// Gateway login response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the established session
    pub session_id: String,
}

/// Gateway error body attached to non-2xx responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayErrorBody {
    /// Short machine code (`EFAILED`, `EMFA`, `ENOTFOUND`, `ENOENT`, ...)
    pub code: String,

    #[serde(default)]
    pub message: String,
}

/// One node in a gateway listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayNode {
    /// Node ID
    pub id: String,

    /// Node name
    pub name: String,

    /// Size in bytes (omitted for directories)
    #[serde(default)]
    pub size: u64,

    /// Upload time in epoch seconds (may be absent for legacy nodes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Opaque content handle
    #[serde(default)]
    pub download_id: String,

    /// Whether the node is a directory
    #[serde(default)]
    pub directory: bool,
}

impl GatewayNode {
    /// Convert to the provider domain type
    pub fn into_entry(self) -> RemoteEntry {
        RemoteEntry {
            node_id: self.id,
            name: self.name,
            size: self.size,
            timestamp: self.timestamp,
            download_id: self.download_id,
            directory: self.directory,
        }
    }
}

/// Gateway folder-children response (account mode)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderChildrenResponse {
    /// The folder that was addressed
    pub parent: GatewayNode,

    /// Its immediate children
    #[serde(default)]
    pub nodes: Vec<GatewayNode>,
}

/// Gateway content-link response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    /// Time-limited retrieval URL
    pub url: String,

    /// Expiry of the locator in epoch seconds, if the gateway bounds it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Gateway public-folder response (shared-link mode)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFolderResponse {
    /// The node the link addresses
    pub node: GatewayNode,

    /// Children when the node is a directory; absent for single-file links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<GatewayNode>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_gateway_node() {
        let json = r#"{
            "id": "n1",
            "name": "wedding.jpg",
            "size": 2048,
            "timestamp": 1700000000,
            "downloadId": "dl-abc",
            "directory": false
        }"#;

        let node: GatewayNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, "n1");
        assert_eq!(node.name, "wedding.jpg");
        assert_eq!(node.size, 2048);
        assert_eq!(node.timestamp, Some(1700000000));

        let entry = node.into_entry();
        assert_eq!(entry.node_id, "n1");
        assert!(!entry.directory);
    }

    #[test]
    fn test_deserialize_node_without_timestamp() {
        let json = r#"{"id": "n2", "name": "old.png"}"#;

        let node: GatewayNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.timestamp, None);
        assert_eq!(node.size, 0);
        assert!(!node.directory);
    }

    #[test]
    fn test_deserialize_folder_children_response() {
        let json = r#"{
            "parent": {"id": "root", "name": "Cloud Drive", "directory": true},
            "nodes": [
                {"id": "n1", "name": "a.jpg", "size": 10, "timestamp": 5, "downloadId": "d1"}
            ]
        }"#;

        let response: FolderChildrenResponse = serde_json::from_str(json).unwrap();
        assert!(response.parent.directory);
        assert_eq!(response.nodes.len(), 1);
    }

    #[test]
    fn test_deserialize_public_folder_single_file() {
        let json = r#"{"node": {"id": "f1", "name": "single.jpg"}}"#;

        let response: PublicFolderResponse = serde_json::from_str(json).unwrap();
        assert!(response.children.is_none());
        assert!(!response.node.directory);
    }

    #[test]
    fn test_serialize_login_request_skips_absent_mfa() {
        let request = LoginRequest {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
            mfa_code: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("mfaCode"));
    }
}
