//! Recency selection policy
//!
//! Pure filter/sort/cap shared by the account connector and the shared-link
//! resolver. Deterministic by construction: identical input and limit always
//! produce the identical output sequence, which downstream layout assignment
//! relies on.

use crate::types::{RemoteEntry, SelectedImage};

/// Recognized image extensions (final dot-delimited suffix, lowercased)
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Whether a file name carries a recognized image extension.
pub fn is_image_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Select the `limit` most recent image entries from an unordered listing.
///
/// Retains non-directory entries with a recognized image extension and a
/// defined timestamp, stable-sorts by timestamp descending (ties keep input
/// order), truncates to `limit` and assigns 0-based recency ranks.
pub fn select_latest_images(entries: &[RemoteEntry], limit: usize) -> Vec<SelectedImage> {
    let mut candidates: Vec<&RemoteEntry> = entries
        .iter()
        .filter(|e| !e.directory)
        .filter(|e| is_image_name(&e.name))
        .filter(|e| e.timestamp.is_some())
        .collect();

    // Vec::sort_by is stable, so equal timestamps preserve input order
    candidates.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    candidates.truncate(limit);

    candidates
        .into_iter()
        .enumerate()
        .map(|(rank, entry)| SelectedImage {
            entry: entry.clone(),
            rank,
        })
        .collect()
}
