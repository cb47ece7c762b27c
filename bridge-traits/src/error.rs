//! Shared error type for host-bridge operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host does not provide this capability
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    /// Transport-level failure (connection, TLS, malformed payload)
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The request deadline elapsed
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
