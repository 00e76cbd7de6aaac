//! Type definitions for L2CAP operations

use thiserror::Error;

/// Error types specific to L2CAP operations
#[derive(Debug, Error)]
pub enum L2capError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported signaling command 0x{0:02X}")]
    NotSupported(u8),

    #[error("HCI error: {0}")]
    HciError(#[from] crate::error::HciError),
}

/// Result type for L2CAP operations
pub type L2capResult<T> = std::result::Result<T, L2capError>;

/// Identifier correlating a signaling request with its response
pub type SignalId = u8;
