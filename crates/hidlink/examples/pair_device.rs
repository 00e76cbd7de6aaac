//! Example: Pairing with a HID device
//!
//! Brings up hci0 on the user channel, inquires for a keyboard, mouse or
//! gamepad, pairs with it and prints the resulting bond. Put the device in
//! pairing mode before running.

use hidlink::hci::{HciChannel, HciSocket};
use hidlink::{BtStatus, Controller, LinkConfig};
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let socket = HciSocket::open(0, HciChannel::User)?;
    let mut controller = Controller::new(socket, LinkConfig::default());
    controller.attach();

    let start = Instant::now();
    let mut status = controller.status();
    while start.elapsed() < Duration::from_secs(120) {
        controller.tick(start.elapsed().as_millis() as u32);

        if controller.status() != status {
            status = controller.status();
            println!("Status: {}", status);
        }

        if let Some((address, link_key)) = controller.take_bond_update() {
            println!("Bonded with {} ({})", address, controller.remote_name());
            println!("Link key: {}", link_key.to_hex());
        }

        if status == BtStatus::Connected {
            println!("Connected on handle 0x{:03X}", controller.hci_handle());
            break;
        }

        if !controller.transport().has_pending() {
            controller.transport().wait_readable(Duration::from_millis(10))?;
        }
    }

    controller.disconnect();
    Ok(())
}
