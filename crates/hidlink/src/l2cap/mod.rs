//! L2CAP (Logical Link Control and Adaptation Protocol) framing
//!
//! This module provides the pieces a HID host needs on the signaling channel:
//! - ACL framing of outbound L2CAP frames
//! - Fixed-layout encoding of the signaling commands a host sends
//! - Header parsing for inbound frames

pub mod constants;
pub mod packet;
pub mod psm;
pub mod signaling;
pub mod types;
#[cfg(test)]
mod tests;

// Re-export the public API
pub use self::packet::{acl_frame, parse_acl, AclHeader, L2capCommandHeader, L2capHeader};
pub use self::psm::Psm;
pub use self::signaling::SignalingCommand;
pub use self::types::*;
