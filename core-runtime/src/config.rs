//! # Gallery Configuration Module
//!
//! Provides configuration management for the gallery sync core.
//!
//! ## Overview
//!
//! A [`GalleryConfig`] is loaded once per session, from server-held
//! environment variables or via the builder, and is immutable thereafter.
//! Its one non-trivial job is access-mode resolution: deciding, exactly
//! once, whether sync runs against a public shared folder or an
//! authenticated account. Shared-link configuration always takes exclusive
//! precedence when both modes resolve.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::GalleryConfig;
//!
//! let config = GalleryConfig::builder()
//!     .shared_folder_url("https://mega.nz/folder/AbC123#key")
//!     .build()
//!     .expect("valid config");
//!
//! let mode = config.resolve_mode().expect("shared mode resolves");
//! ```

use crate::error::{Error, Result};
use serde::Serialize;
use std::env;
use std::time::Duration;

/// Default number of images to select per sync
pub const DEFAULT_SYNC_LIMIT: usize = 2;

/// Default client polling interval (5 minutes)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(300_000);

/// Account credentials as held in configuration
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Folder to list instead of the account root
    pub folder_scope: Option<String>,
    /// Second-factor code, when the account has MFA enabled
    pub mfa_code: Option<String>,
}

/// The access mode a session runs in, chosen once at config-resolution time.
#[derive(Debug, Clone)]
pub enum SyncMode {
    /// Public shared-folder link plus out-of-band capability key
    SharedLink {
        folder_url: String,
        /// Key supplied separately when the address lost its `#fragment`
        key_fragment: Option<String>,
    },
    /// Authenticated account session
    Account(Credentials),
}

impl SyncMode {
    pub fn tag(&self) -> ModeTag {
        match self {
            SyncMode::SharedLink { .. } => ModeTag::Shared,
            SyncMode::Account(_) => ModeTag::Account,
        }
    }
}

/// Lightweight tag identifying the active access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeTag {
    Shared,
    Account,
}

impl std::fmt::Display for ModeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeTag::Shared => write!(f, "shared"),
            ModeTag::Account => write!(f, "account"),
        }
    }
}

/// Which configuration blocks are present, for surfacing to clients without
/// leaking the values themselves.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub has_shared_folder: bool,
    pub has_credentials: bool,
}

/// Session-immutable gallery configuration.
///
/// All fields are optional; [`GalleryConfig::resolve_mode`] decides whether
/// any sync runs at all.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Public shared-folder address
    pub shared_folder_url: Option<String>,

    /// Capability key when it is not embedded in the address fragment
    pub shared_key_fragment: Option<String>,

    /// Account identifier
    pub email: Option<String>,

    /// Account secret
    pub password: Option<String>,

    /// Folder to list instead of the account root (account mode only)
    pub folder_scope: Option<String>,

    /// Second-factor code (account mode only)
    pub mfa_code: Option<String>,

    /// Number of images to select per sync
    pub limit: usize,

    /// Client polling interval
    pub refresh_interval: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            shared_folder_url: None,
            shared_key_fragment: None,
            email: None,
            password: None,
            folder_scope: None,
            mfa_code: None,
            limit: DEFAULT_SYNC_LIMIT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl GalleryConfig {
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Load configuration from server-held environment variables.
    ///
    /// Recognized variables: `MEGA_SHARED_FOLDER_URL`, `MEGA_SHARED_KEY`,
    /// `MEGA_EMAIL`, `MEGA_PASSWORD`, `MEGA_FOLDER_ID`, `MEGA_MFA_CODE`.
    /// Empty values are treated as absent.
    pub fn from_env() -> Self {
        Self {
            shared_folder_url: env_non_empty("MEGA_SHARED_FOLDER_URL"),
            shared_key_fragment: env_non_empty("MEGA_SHARED_KEY"),
            email: env_non_empty("MEGA_EMAIL"),
            password: env_non_empty("MEGA_PASSWORD"),
            folder_scope: env_non_empty("MEGA_FOLDER_ID"),
            mfa_code: env_non_empty("MEGA_MFA_CODE"),
            ..Self::default()
        }
    }

    /// Resolve the active access mode, exactly once per session.
    ///
    /// Shared-link configuration takes exclusive precedence over credential
    /// configuration; when neither resolves, no sync attempt is made.
    pub fn resolve_mode(&self) -> Option<SyncMode> {
        if let Some(url) = non_empty(self.shared_folder_url.as_deref()) {
            return Some(SyncMode::SharedLink {
                folder_url: url.to_string(),
                key_fragment: non_empty(self.shared_key_fragment.as_deref())
                    .map(str::to_string),
            });
        }

        match (
            non_empty(self.email.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(email), Some(password)) => Some(SyncMode::Account(Credentials {
                email: email.to_string(),
                password: password.to_string(),
                folder_scope: self.folder_scope.clone(),
                mfa_code: self.mfa_code.clone(),
            })),
            _ => None,
        }
    }

    /// Which configuration blocks are present
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            has_shared_folder: non_empty(self.shared_folder_url.as_deref()).is_some(),
            has_credentials: non_empty(self.email.as_deref()).is_some()
                && non_empty(self.password.as_deref()).is_some(),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builder for [`GalleryConfig`] with fail-fast validation.
#[derive(Debug, Default)]
pub struct GalleryConfigBuilder {
    shared_folder_url: Option<String>,
    shared_key_fragment: Option<String>,
    email: Option<String>,
    password: Option<String>,
    folder_scope: Option<String>,
    mfa_code: Option<String>,
    limit: Option<usize>,
    refresh_interval: Option<Duration>,
}

impl GalleryConfigBuilder {
    pub fn shared_folder_url(mut self, url: impl Into<String>) -> Self {
        self.shared_folder_url = Some(url.into());
        self
    }

    pub fn shared_key_fragment(mut self, key: impl Into<String>) -> Self {
        self.shared_key_fragment = Some(key.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn folder_scope(mut self, scope: impl Into<String>) -> Self {
        self.folder_scope = Some(scope.into());
        self
    }

    pub fn mfa_code(mut self, code: impl Into<String>) -> Self {
        self.mfa_code = Some(code.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<GalleryConfig> {
        let limit = self.limit.unwrap_or(DEFAULT_SYNC_LIMIT);
        if limit == 0 {
            return Err(Error::Config("sync limit must be at least 1".to_string()));
        }

        let refresh_interval = self.refresh_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL);
        if refresh_interval.is_zero() {
            return Err(Error::Config(
                "refresh interval must be non-zero".to_string(),
            ));
        }

        Ok(GalleryConfig {
            shared_folder_url: self.shared_folder_url,
            shared_key_fragment: self.shared_key_fragment,
            email: self.email,
            password: self.password,
            folder_scope: self.folder_scope,
            mfa_code: self.mfa_code,
            limit,
            refresh_interval,
        })
    }
}
