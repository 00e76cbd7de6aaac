//! Bluetooth HCI (Host Controller Interface) implementation
//!
//! Command encoding, event decoding and a Linux socket transport.

pub mod constants;
pub mod event;
pub mod packet;
pub mod socket;


pub use event::{Event, EventCode, InquiryResponse};
pub use packet::{opcode, HciCommand, HciEvent};
pub use socket::{HciChannel, HciSocket};
