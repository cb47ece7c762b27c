//! # MEGA Storage Provider
//!
//! Connector for the MEGA-style storage gateway underpinning the gallery
//! sync pipeline.
//!
//! ## Overview
//!
//! This module provides:
//! - Account-mode sessions: connect, list a folder, resolve download
//!   locators, disconnect
//! - Shared-link mode: parse a public folder reference and list it without
//!   any stored credential
//! - The recency selection policy shared by both modes
//!
//! Both listing paths return the same ordered [`SelectedImage`] sequence, so
//! downstream consumers never care which access mode produced it.

pub mod connector;
pub mod error;
pub mod selection;
pub mod shared;
pub mod types;

pub use connector::{Credentials, MegaConnector, MegaSession};
pub use error::{MegaError, Result};
pub use selection::select_latest_images;
pub use shared::{SharedFolderRef, SharedLinkResolver};
pub use types::{RemoteEntry, SelectedImage};
