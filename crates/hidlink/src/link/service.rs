//! Profile services fed with inbound ACL data.

use crate::error::{Error, HciError};
use crate::hci::constants::HCI_OE_USER_ENDED_CONNECTION;
use crate::hci::HciCommand;
use crate::l2cap::{acl_frame, SignalingCommand};
use crate::link::command::CommandTracker;
use crate::link::state::LinkState;
use crate::link::transport::Transport;
use log::{debug, warn};
use std::time::Duration;

pub const MAX_SERVICES: usize = 4;

/// A profile layered on the ACL link (HID, SDP, RFCOMM, ...).
pub trait BluetoothService {
    /// Called with every inbound ACL packet, whatever its handle.
    fn on_acl_data(&mut self, data: &[u8], ctx: &mut ServiceContext<'_>);

    /// Called once per tick after inbound data has been dispatched.
    fn run(&mut self, _ctx: &mut ServiceContext<'_>) {}

    /// Tear down any channels; the link is going away or has gone.
    fn on_disconnect(&mut self, ctx: &mut ServiceContext<'_>);

    /// The controller is being re-initialized.
    fn on_reset(&mut self);
}

/// What a service may see and do while it is being called.
pub struct ServiceContext<'a> {
    transport: &'a mut dyn Transport,
    commands: &'a mut CommandTracker,
    link: &'a LinkState,
    now: u32,
    send_retry_delay: Duration,
}

impl<'a> ServiceContext<'a> {
    pub(crate) fn new(
        transport: &'a mut dyn Transport,
        commands: &'a mut CommandTracker,
        link: &'a LinkState,
        now: u32,
        send_retry_delay: Duration,
    ) -> Self {
        Self {
            transport,
            commands,
            link,
            now,
            send_retry_delay,
        }
    }

    pub fn hci_handle(&self) -> u16 {
        self.link.hci_handle
    }

    pub fn connected_to_hid(&self) -> bool {
        self.link.connected_to_hid
    }

    pub fn incoming_hid_device(&self) -> bool {
        self.link.incoming_hid_device
    }

    pub fn pair_with_hid_device(&self) -> bool {
        self.link.pair_with_hid_device
    }

    pub fn remote_name(&self) -> &str {
        &self.link.remote_name
    }

    /// Send a signaling command on the current link.
    pub fn send_signaling(&mut self, command: &SignalingCommand) -> Result<(), HciError> {
        let frame = command.to_acl(self.link.hci_handle);
        self.write(&frame)
    }

    /// Send an L2CAP payload on `channel_id` over the current link.
    pub fn send_acl(&mut self, channel_id: u16, payload: &[u8]) -> Result<(), HciError> {
        let frame = acl_frame(self.link.hci_handle, channel_id, payload);
        self.write(&frame)
    }

    fn write(&mut self, frame: &[u8]) -> Result<(), HciError> {
        if let Err(e) = self.transport.send_data(frame) {
            warn!("ACL write failed: {}", e);
            self.transport.delay(self.send_retry_delay);
            return Err(e);
        }
        Ok(())
    }

    /// Drop the ACL link.
    pub fn disconnect(&mut self) -> Result<(), HciError> {
        let handle = self.link.hci_handle;
        debug!("service requested disconnect of handle 0x{:03X}", handle);
        self.commands.issue(
            &mut *self.transport,
            HciCommand::Disconnect {
                handle,
                reason: HCI_OE_USER_ENDED_CONNECTION,
            },
            self.now,
        )
    }
}

/// Fixed-capacity list of services, called in registration order.
#[derive(Default)]
pub struct ServiceRegistry {
    services: Vec<Box<dyn BluetoothService>>,
}

impl ServiceRegistry {
    /// Returns the slot index of the new service.
    pub fn register(&mut self, service: Box<dyn BluetoothService>) -> Result<usize, Error> {
        if self.services.len() >= MAX_SERVICES {
            return Err(Error::ServiceRegistryFull(MAX_SERVICES));
        }
        self.services.push(service);
        Ok(self.services.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn BluetoothService>> {
        self.services.iter_mut()
    }

    pub(crate) fn reset_all(&mut self) {
        for service in self.services.iter_mut() {
            service.on_reset();
        }
    }
}
