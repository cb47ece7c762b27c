//! Error types for the MEGA storage provider

use thiserror::Error;

/// MEGA provider errors
#[derive(Error, Debug)]
pub enum MegaError {
    /// Gateway rejected the account credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Account requires a second factor that was not supplied
    #[error("Multi-factor authentication required")]
    MfaRequired,

    /// Session was already released or never established
    #[error("Storage session not connected")]
    NotConnected,

    /// Folder scope does not resolve to a directory
    #[error("Invalid folder scope or not a directory: {scope}")]
    InvalidScope { scope: String },

    /// Shared address does not match the public folder-reference shape
    #[error("Invalid shared folder link: {0}")]
    InvalidLink(String),

    /// No capability secret embedded in the address or supplied separately
    #[error("Shared folder link is missing its key fragment")]
    MissingSecret,

    /// File or folder no longer resolves
    #[error("Not found: {0}")]
    NotFound(String),

    /// Directory holds zero qualifying image entries
    #[error("No image files found in the shared folder")]
    EmptyFolder,

    /// Gateway returned an error response
    #[error("Storage gateway error {code} (status {status_code}): {message}")]
    Api {
        status_code: u16,
        code: String,
        message: String,
    },

    /// Failed to parse a gateway response
    #[error("Failed to parse gateway response: {0}")]
    Parse(String),

    /// Bridge error
    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

/// Result type for MEGA provider operations
pub type Result<T> = std::result::Result<T, MegaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MegaError::Api {
            status_code: 404,
            code: "ENOTFOUND".to_string(),
            message: "folder gone".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Storage gateway error ENOTFOUND (status 404): folder gone"
        );
    }

    #[test]
    fn test_bridge_error_conversion() {
        let bridge = bridge_traits::error::BridgeError::OperationFailed("boom".to_string());
        let error: MegaError = bridge.into();

        assert!(matches!(error, MegaError::Bridge(_)));
    }
}
