//! hidlink - Bluetooth BR/EDR link establishment for HID hosts
//!
//! This library brings up a Bluetooth controller over HCI, decides whether to
//! inquire for a new HID device or wait for a bonded one to reconnect, runs
//! Secure Simple Pairing with a NoInputNoOutput capability, and hands inbound
//! ACL data to pluggable profile services. It includes the HCI command/event
//! codec, L2CAP signaling encoders and a Linux HCI socket transport.

pub mod error;
pub mod gap;
pub mod hci;
pub mod l2cap;
pub mod link;

// Re-export common types for convenience
pub use error::{Error, HciError, Result};
pub use gap::{BdAddr, ClassOfDevice, LinkKey};
pub use hci::{Event, HciChannel, HciCommand, HciEvent, HciSocket};
pub use l2cap::{L2capError, Psm, SignalingCommand};
pub use link::{
    BluetoothService, BtStatus, Controller, HciFlags, InitState, LinkConfig, Pipe, ServiceContext, Transport,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_hci_socket() {
        // This test will only pass if run with sufficient privileges
        // and if a Bluetooth adapter is available
        let result = HciSocket::open(0, HciChannel::Raw);

        // We don't assert here because the test might fail in environments
        // without Bluetooth hardware or sufficient privileges
        if let Ok(socket) = result {
            assert!(socket.as_raw_fd() > 0);
        }
    }
}
