//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the gallery sync core:
//! - Logging and tracing infrastructure
//! - Gallery configuration and access-mode resolution
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other modules depend on. It
//! establishes the logging conventions and holds the session-immutable
//! configuration that decides whether sync runs in shared-link or credential
//! mode.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigSummary, Credentials, GalleryConfig, ModeTag, SyncMode};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
