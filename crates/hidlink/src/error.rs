//! Error types for the hidlink library
//!
//! This module defines the error types used throughout the library.

use thiserror::Error;

/// Errors that can occur when talking to the controller
#[derive(Error, Debug)]
pub enum HciError {
    #[error("Failed to open HCI socket: {0}")]
    SocketError(#[from] std::io::Error),

    #[error("Failed to bind to HCI device: {0}")]
    BindError(std::io::Error),

    #[error("Failed to send HCI packet: {0}")]
    SendError(std::io::Error),

    #[error("Failed to receive HCI packet: {0}")]
    ReceiveError(std::io::Error),

    #[error("Invalid HCI packet format")]
    InvalidPacketFormat,

    #[error("Truncated event 0x{code:02X}: need {expected} parameter bytes, got {actual}")]
    TruncatedEvent {
        code: u8,
        expected: usize,
        actual: usize,
    },
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("HCI error: {0}")]
    Hci(#[from] HciError),

    #[error("L2CAP error: {0}")]
    L2cap(#[from] crate::l2cap::L2capError),

    #[error("Service registry is full ({0} services)")]
    ServiceRegistryFull(usize),

    #[error("Invalid Bluetooth address: {0}")]
    InvalidAddress(String),

    #[error("Invalid link key: {0}")]
    InvalidLinkKey(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, Error>;
