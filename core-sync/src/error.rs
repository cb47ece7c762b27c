//! Failure taxonomy surfaced to sync callers
//!
//! Every error that aborts a sync request is classified into one
//! [`FailureKind`] with an HTTP-style status, mirroring what the gallery
//! client keys its messaging on. Per-entry fetch failures never reach this
//! type; they stay in-band as degraded entries.

use provider_mega::MegaError;
use serde::Serialize;
use thiserror::Error;

/// Failure classification surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Malformed address, missing secret, unusable request
    BadRequest,
    /// Absent file/folder, single-file link used as folder, empty directory
    NotFound,
    /// Second factor needed but absent
    MfaRequired,
    /// Remote rejected the credentials
    UpstreamAuth,
    /// Transient remote failure
    UpstreamTransient,
    /// Unexpected internal failure
    Internal,
}

impl FailureKind {
    /// HTTP-style status for the wire contract
    pub fn status_code(self) -> u16 {
        match self {
            FailureKind::BadRequest => 400,
            FailureKind::NotFound => 404,
            FailureKind::MfaRequired => 401,
            FailureKind::UpstreamAuth
            | FailureKind::UpstreamTransient
            | FailureKind::Internal => 500,
        }
    }
}

/// A classified sync failure
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct SyncFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SyncFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(FailureKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal, message)
    }

    /// Whether the caller must prompt for a second factor
    pub fn requires_mfa(&self) -> bool {
        self.kind == FailureKind::MfaRequired
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Serializable failure body for the wire contract
    pub fn body(&self) -> FailureBody {
        FailureBody {
            error: self.message.clone(),
            requires_mfa: self.requires_mfa().then_some(true),
        }
    }
}

/// Wire shape of a failure response
#[derive(Debug, Clone, Serialize)]
pub struct FailureBody {
    pub error: String,

    #[serde(rename = "requiresMFA", skip_serializing_if = "Option::is_none")]
    pub requires_mfa: Option<bool>,
}

impl From<MegaError> for SyncFailure {
    fn from(err: MegaError) -> Self {
        let kind = match &err {
            MegaError::MfaRequired => FailureKind::MfaRequired,
            MegaError::AuthenticationFailed(_) => FailureKind::UpstreamAuth,
            MegaError::InvalidLink(_) | MegaError::MissingSecret => FailureKind::BadRequest,
            MegaError::InvalidScope { .. }
            | MegaError::NotFound(_)
            | MegaError::EmptyFolder => FailureKind::NotFound,
            MegaError::Api { code, .. } => match code.as_str() {
                // Gateway markers carried over from the upstream API
                "ENOTFOUND" => FailureKind::NotFound,
                "ENOENT" => FailureKind::BadRequest,
                "EFAILED" => FailureKind::UpstreamAuth,
                _ => FailureKind::UpstreamTransient,
            },
            MegaError::Bridge(_) => FailureKind::UpstreamTransient,
            MegaError::NotConnected | MegaError::Parse(_) => FailureKind::Internal,
        };

        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FailureKind::BadRequest.status_code(), 400);
        assert_eq!(FailureKind::NotFound.status_code(), 404);
        assert_eq!(FailureKind::MfaRequired.status_code(), 401);
        assert_eq!(FailureKind::UpstreamAuth.status_code(), 500);
        assert_eq!(FailureKind::UpstreamTransient.status_code(), 500);
        assert_eq!(FailureKind::Internal.status_code(), 500);
    }

    #[test]
    fn test_classify_provider_errors() {
        let cases = [
            (MegaError::MfaRequired, FailureKind::MfaRequired),
            (
                MegaError::AuthenticationFailed("EFAILED: no".to_string()),
                FailureKind::UpstreamAuth,
            ),
            (
                MegaError::InvalidLink("x".to_string()),
                FailureKind::BadRequest,
            ),
            (MegaError::MissingSecret, FailureKind::BadRequest),
            (MegaError::EmptyFolder, FailureKind::NotFound),
            (
                MegaError::NotFound("n1".to_string()),
                FailureKind::NotFound,
            ),
            (MegaError::NotConnected, FailureKind::Internal),
        ];

        for (err, expected) in cases {
            let failure: SyncFailure = err.into();
            assert_eq!(failure.kind, expected, "{}", failure.message);
        }
    }

    #[test]
    fn test_classify_gateway_codes() {
        let not_found: SyncFailure = MegaError::Api {
            status_code: 404,
            code: "ENOTFOUND".to_string(),
            message: "gone".to_string(),
        }
        .into();
        assert_eq!(not_found.kind, FailureKind::NotFound);

        let bad_ref: SyncFailure = MegaError::Api {
            status_code: 400,
            code: "ENOENT".to_string(),
            message: "bad reference".to_string(),
        }
        .into();
        assert_eq!(bad_ref.kind, FailureKind::BadRequest);

        let transient: SyncFailure = MegaError::Api {
            status_code: 503,
            code: "EAGAIN".to_string(),
            message: "busy".to_string(),
        }
        .into();
        assert_eq!(transient.kind, FailureKind::UpstreamTransient);
    }

    #[test]
    fn test_failure_body_serialization() {
        let plain = SyncFailure::new(FailureKind::NotFound, "no images").body();
        let json = serde_json::to_string(&plain).unwrap();
        assert_eq!(json, r#"{"error":"no images"}"#);

        let mfa: SyncFailure = MegaError::MfaRequired.into();
        let json = serde_json::to_string(&mfa.body()).unwrap();
        assert!(json.contains(r#""requiresMFA":true"#));
    }
}
