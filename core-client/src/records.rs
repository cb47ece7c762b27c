//! Client-side photo records
//!
//! The gallery renders [`PhotoRecord`]s, not raw sync responses. Conversion
//! happens once per successful sync; records from the remote source are
//! display-only and never enter the client's local persistence.

use chrono::{DateTime, Utc};
use core_sync::{Provenance, SizeClass, SyncResponse, SyncedImage};
use serde::Serialize;

/// Attribution shown for every remotely sourced photo
pub const REMOTE_UPLOADER: &str = "MEGA";

/// One photo as the gallery client holds it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,

    /// Self-contained data URL; rendering needs no further network access
    pub url: String,

    /// Alternate text, taken from the remote file name
    pub alt: String,

    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,

    pub position: u32,
    pub x: u32,
    pub y: u32,
    pub size: SizeClass,
    pub source: Provenance,
}

impl PhotoRecord {
    /// Whether this record may enter the client's local persistence.
    ///
    /// Remote-sourced records are re-fetched every cycle and must not be
    /// saved alongside locally uploaded photos.
    pub fn is_locally_persistable(&self) -> bool {
        self.source.is_locally_persistable()
    }
}

impl From<&SyncedImage> for PhotoRecord {
    fn from(image: &SyncedImage) -> Self {
        Self {
            id: image.id.clone(),
            url: image.download_url.clone(),
            alt: image.name.clone(),
            uploaded_at: DateTime::<Utc>::from_timestamp(image.timestamp, 0)
                .unwrap_or_default(),
            uploaded_by: REMOTE_UPLOADER.to_string(),
            position: image.position,
            x: image.x,
            y: image.y,
            size: image.size,
            source: image.source,
        }
    }
}

/// Convert a sync response into display records, preserving order.
pub fn records_from_response(response: &SyncResponse) -> Vec<PhotoRecord> {
    response.images.iter().map(PhotoRecord::from).collect()
}
