//! # Sync Pipeline Module
//!
//! Orchestrates one sync request against the remote storage gateway.
//!
//! ## Overview
//!
//! This module drives the acquisition pipeline end to end:
//! - Validating the request and dispatching on the resolved access mode
//! - Listing the folder (account session or shared link) with the recency
//!   selection policy applied
//! - Fetching every selected entry concurrently and embedding the bytes as
//!   data URLs, isolating per-entry failures
//! - Classifying failures into the wire taxonomy with HTTP-style statuses
//!
//! ## Components
//!
//! - **Content Fetcher** (`fetcher`): download + MIME-tagged embedding with
//!   a byte-size cap
//! - **Layout Hints** (`layout`): legacy placement formulas, applied only at
//!   the response boundary
//! - **Response Types** (`response`): the normalized wire contract
//! - **Sync Service** (`endpoint`): the stateless per-request state machine

pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod layout;
pub mod response;

pub use endpoint::{SyncRequest, SyncService};
pub use error::{FailureKind, SyncFailure};
pub use fetcher::{ContentFetcher, FetchedImage, FetcherConfig};
pub use layout::{layout_for_rank, LayoutHints};
pub use response::{Provenance, SizeClass, SyncResponse, SyncedImage};
