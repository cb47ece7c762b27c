//! Normalized wire contract of the sync endpoint
//!
//! Field names follow the legacy client contract (camelCase, `mega-{n}` ids,
//! epoch-second timestamps), so both the bundled client controller and
//! external presentation collaborators can decode responses unchanged.

use serde::{Deserialize, Serialize};

/// Card size class used by the presentation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

/// Where a photo record originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Added on the client and persisted locally
    Local,
    /// Synced from the remote storage folder
    Mega,
}

impl Provenance {
    /// Remote records are never written to the local persistence collaborator
    pub fn is_locally_persistable(self) -> bool {
        self != Provenance::Mega
    }
}

/// One synced image in the response sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedImage {
    /// `mega-{rank+1}` where rank is the 0-based selection position
    pub id: String,

    /// Remote file name
    pub name: String,

    /// Remote size in bytes
    pub file_size: u64,

    /// Upload timestamp in epoch seconds
    pub timestamp: i64,

    /// Embedded data URL, or empty when the entry is degraded
    pub download_url: String,

    /// Legacy placement hints consumed by the presentation collaborator
    pub position: u32,
    pub x: u32,
    pub y: u32,
    pub size: SizeClass,

    /// Always [`Provenance::Mega`] for synced entries
    pub source: Provenance,

    /// Per-entry fetch failure, when the entry is degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncedImage {
    /// Whether this entry failed retrieval and carries no content
    pub fn is_degraded(&self) -> bool {
        self.error.is_some() || self.download_url.is_empty()
    }
}

/// Successful sync response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub images: Vec<SyncedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyncedImage {
        SyncedImage {
            id: "mega-1".to_string(),
            name: "a.jpg".to_string(),
            file_size: 10,
            timestamp: 300,
            download_url: "data:image/jpeg;base64,AAAA".to_string(),
            position: 4,
            x: 300,
            y: 200,
            size: SizeClass::Medium,
            source: Provenance::Mega,
            error: None,
        }
    }

    #[test]
    fn test_serializes_with_legacy_field_names() {
        let json = serde_json::to_string(&sample()).unwrap();

        assert!(json.contains(r#""fileSize":10"#));
        assert!(json.contains(r#""downloadUrl":"#));
        assert!(json.contains(r#""size":"medium""#));
        assert!(json.contains(r#""source":"mega""#));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_degraded_entry_detection() {
        let mut image = sample();
        assert!(!image.is_degraded());

        image.download_url = String::new();
        image.error = Some("download failed".to_string());
        assert!(image.is_degraded());
    }

    #[test]
    fn test_provenance_persistability() {
        assert!(Provenance::Local.is_locally_persistable());
        assert!(!Provenance::Mega.is_locally_persistable());
    }

    #[test]
    fn test_round_trips_through_client_decode() {
        let response = SyncResponse {
            images: vec![sample()],
        };
        let json = serde_json::to_string(&response).unwrap();
        let decoded: SyncResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.images[0].id, "mega-1");
        assert_eq!(decoded.images[0].timestamp, 300);
    }
}
