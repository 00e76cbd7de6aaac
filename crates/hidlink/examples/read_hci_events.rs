//! Example: Reading HCI events
//!
//! Resets the controller on hci0 and prints every decoded event for a few seconds.

use hidlink::hci::{Event, HciChannel, HciCommand, HciSocket};
use hidlink::{Pipe, Transport};
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Opening HCI socket for device 0...");
    let mut socket = HciSocket::open(0, HciChannel::Raw)?;

    println!("Sending HCI Reset command...");
    socket.send_command(&HciCommand::Reset.to_bytes())?;

    println!("\nReading HCI events for 5 seconds...");
    let start_time = Instant::now();
    let mut buf = [0u8; 257];

    while start_time.elapsed() < Duration::from_secs(5) {
        if !socket.wait_readable(Duration::from_millis(100))? {
            continue;
        }
        let len = socket.receive(Pipe::Event, &mut buf)?;
        if len == 0 {
            continue;
        }
        match Event::parse(&buf[..len]) {
            Ok(event) => println!("Received event: {:?}", event),
            Err(e) => eprintln!("Error decoding event: {}", e),
        }
    }

    println!("Finished reading events");
    Ok(())
}
