//! hidlinkd: keeps one HID device paired and connected to a local adapter.

mod config;
mod error;

use std::time::{Duration, Instant};

use hidlink::l2cap::constants::L2CAP_SIGNALING_CID;
use hidlink::l2cap::{parse_acl, SignalingCommand};
use hidlink::{BluetoothService, Controller, HciSocket, ServiceContext};
use log::{debug, error, info, warn};

use crate::{config::Config, error::Result};

// Upper bound on how long the loop sleeps waiting for the socket
const IDLE_WAIT: Duration = Duration::from_millis(10);

/// Logs inbound L2CAP traffic. Stands in for a HID profile service.
struct AclLogger;

impl BluetoothService for AclLogger {
    fn on_acl_data(&mut self, data: &[u8], ctx: &mut ServiceContext<'_>) {
        let (acl, l2cap, payload) = match parse_acl(data) {
            Ok(parts) => parts,
            Err(e) => {
                debug!("unparseable ACL packet: {}", e);
                return;
            }
        };
        if acl.handle != ctx.hci_handle() {
            return;
        }

        if l2cap.channel_id == L2CAP_SIGNALING_CID {
            match SignalingCommand::parse(payload) {
                Ok(command) => info!("signaling from peer: {:?}", command),
                Err(e) => debug!("signaling: {}", e),
            }
        } else {
            debug!("cid 0x{:04X}: {}", l2cap.channel_id, hex::encode(payload));
        }
    }

    fn on_disconnect(&mut self, _ctx: &mut ServiceContext<'_>) {
        info!("link closed");
    }

    fn on_reset(&mut self) {}
}

fn run() -> Result<()> {
    let mut config = Config::load()?;
    info!(
        "hci{} ({:?} channel), bonded device: {}",
        config.device_id,
        config.channel,
        config.bond.as_ref().map_or("none", |bond| bond.address.as_str())
    );

    let socket = HciSocket::open(config.device_id, config.channel.into())?.with_poll_interval(config.poll_interval_ms);
    let mut controller = Controller::new(socket, config.link_config()?);
    controller.register_service(Box::new(AclLogger))?;
    controller.attach();

    let start = Instant::now();
    let mut status = controller.status();
    loop {
        // Millisecond clock; wraps after ~49 days, which tick() tolerates
        let now = start.elapsed().as_millis() as u32;
        controller.tick(now);

        if controller.status() != status {
            status = controller.status();
            info!("status: {}", status);
        }

        if let Some((address, link_key)) = controller.take_bond_update() {
            info!("bonded with {}", address);
            config.set_bond(address, link_key);
            if let Err(e) = config.save() {
                warn!("failed to save bond: {}", e);
            }
        }

        // Queued packets are handed out one per tick; only sleep once they are gone
        if !controller.transport().has_pending() {
            controller.transport().wait_readable(IDLE_WAIT)?;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting hidlinkd...");

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
