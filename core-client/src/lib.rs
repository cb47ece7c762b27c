//! # Gallery Client Module
//!
//! Client-side half of the sync pipeline.
//!
//! ## Overview
//!
//! This module provides:
//! - [`PhotoSyncController`]: the polling controller that refreshes the
//!   gallery from the remote folder on a fixed interval
//! - [`PhotoRecord`]: the display record the gallery renders, decoded from
//!   sync responses
//! - [`SyncBackend`]: the seam between the controller and the server-side
//!   sync service
//!
//! The controller is resilient by retention: a failed refresh surfaces an
//! error message but never clears photos a previous refresh delivered.

pub mod hook;
pub mod records;

pub use hook::{
    PhotoSyncController, SyncBackend, SyncPhase, SyncState, CONNECTION_FAILED_MESSAGE,
    MFA_REQUIRED_MESSAGE,
};
pub use records::{records_from_response, PhotoRecord, REMOTE_UPLOADER};
