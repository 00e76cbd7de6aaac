//! Boundary to the controller: one command channel, one event pipe, one ACL pipe.

use crate::error::HciError;
use std::time::Duration;

/// Inbound pipes polled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipe {
    /// HCI events (`code | length | parameters`)
    Event,
    /// Inbound ACL data (`handle/flags | length | L2CAP`)
    AclIn,
}

pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1;

/// Packet transport to a Bluetooth controller.
///
/// Implementations must never block in `receive`: a read with nothing
/// available returns `Ok(0)`. Any `Err` is treated as a transient fault
/// and the caller retries on its next tick.
pub trait Transport {
    /// Read at most one packet from `pipe` into `buf`, returning its length.
    fn receive(&mut self, pipe: Pipe, buf: &mut [u8]) -> Result<usize, HciError>;

    /// Write one command (`opcode | length | parameters`) to the controller.
    fn send_command(&mut self, command: &[u8]) -> Result<(), HciError>;

    /// Write one outbound ACL packet.
    fn send_data(&mut self, data: &[u8]) -> Result<(), HciError>;

    /// Interval at which the event pipe should be serviced.
    fn poll_interval_ms(&self) -> u32 {
        DEFAULT_POLL_INTERVAL_MS
    }

    /// Back off after a failed write.
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
