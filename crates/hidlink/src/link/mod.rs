//! Link manager: controller bring-up, scan/inquiry/connect decisions and
//! Secure Simple Pairing, driven by a cooperative `tick`.
//!
//! The [`Controller`] owns every piece of link state. An outside loop calls
//! [`Controller::tick`] with a millisecond clock; each due tick runs the
//! bring-up sequence (or, once it has finished, the link manager), then
//! interprets at most one HCI event, then hands any inbound ACL packet to
//! the registered services.

pub mod command;
pub mod config;
mod events;
pub mod flags;
mod init;
mod orchestrator;
pub mod service;
pub mod state;
pub mod transport;


pub use command::{CommandTracker, PendingCommand};
pub use config::LinkConfig;
pub use flags::{FlagRegister, HciFlags};
pub use service::{BluetoothService, ServiceContext, ServiceRegistry, MAX_SERVICES};
pub use state::{BtStatus, InitState, LinkState};
pub use transport::{Pipe, Transport};

use crate::error::{HciError, Result};
use crate::gap::{BdAddr, LinkKey};
use crate::hci::constants::{HCI_MAX_ACL_PACKET, HCI_MAX_EVENT_SIZE, HCI_OE_USER_ENDED_CONNECTION};
use crate::hci::{Event, HciCommand};
use log::{debug, info, trace, warn};

/// Host side of one Bluetooth controller.
pub struct Controller<T: Transport> {
    transport: T,
    config: LinkConfig,
    flags: FlagRegister,
    commands: CommandTracker,
    link: LinkState,
    services: ServiceRegistry,

    init_state: InitState,
    init_step_ready: bool,
    init_complete: bool,
    status: BtStatus,
    local_addr: BdAddr,
    pending_bond: Option<(BdAddr, LinkKey)>,

    poll_enabled: bool,
    poll_interval: u32,
    next_poll: Option<u32>,
    now: u32,

    hci_buf: [u8; HCI_MAX_EVENT_SIZE],
    acl_buf: [u8; HCI_MAX_ACL_PACKET],
}

impl<T: Transport> Controller<T> {
    /// Create a controller. Nothing is sent until [`attach`](Self::attach).
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self {
            transport,
            config,
            flags: FlagRegister::default(),
            commands: CommandTracker::default(),
            link: LinkState::default(),
            services: ServiceRegistry::default(),
            init_state: InitState::Reset,
            init_step_ready: true,
            init_complete: false,
            status: BtStatus::None,
            local_addr: BdAddr::ZERO,
            pending_bond: None,
            poll_enabled: false,
            poll_interval: 0,
            next_poll: None,
            now: 0,
            hci_buf: [0; HCI_MAX_EVENT_SIZE],
            acl_buf: [0; HCI_MAX_ACL_PACKET],
        }
    }

    /// The transport is up: start polling and restart bring-up from Reset.
    pub fn attach(&mut self) {
        self.initialize();
        self.poll_interval = self.transport.poll_interval_ms();
        self.next_poll = None;
        self.poll_enabled = true;
        info!("attached, polling every {} ms", self.poll_interval);
    }

    /// The transport went away. Link state returns to defaults; the bond is kept.
    pub fn release(&mut self) {
        self.poll_enabled = false;
        self.poll_interval = 0;
        self.next_poll = None;
        self.initialize();
        info!("released");
    }

    fn initialize(&mut self) {
        self.flags.reset();
        self.commands.clear();
        self.commands.reset_retries();
        self.link.clear();
        self.init_state = InitState::Reset;
        self.init_step_ready = true;
        self.init_complete = false;
        self.status = BtStatus::None;
        self.local_addr = BdAddr::ZERO;
        self.services.reset_all();
        self.zero_buffers();
    }

    /// Run one scheduling step at time `now` (milliseconds, wrapping).
    ///
    /// Does nothing before [`attach`](Self::attach) or while the previous
    /// due tick is less than one poll interval old.
    pub fn tick(&mut self, now: u32) {
        if !self.poll_enabled {
            return;
        }
        if let Some(next) = self.next_poll {
            if (now.wrapping_sub(next) as i32) < 0 {
                return;
            }
        }
        self.next_poll = Some(now.wrapping_add(self.poll_interval));
        self.now = now;

        self.expire_command();

        if self.init_complete {
            self.run_link_manager();
        } else {
            self.run_init();
        }

        match self.poll_event() {
            Ok(()) => self.poll_acl(),
            Err(e) => warn!("event pipe: {}, skipping tick", e),
        }

        self.zero_buffers();
    }

    fn expire_command(&mut self) {
        let Some(expired) = self.commands.expire(self.now, self.config.command_timeout_ms) else {
            return;
        };
        warn!(
            "opcode 0x{:04X} unanswered after {} ms",
            expired.opcode, self.config.command_timeout_ms
        );
        if !self.init_complete {
            self.init_step_failed();
        }
        self.commands.flush(&mut self.transport, self.now);
    }

    fn poll_event(&mut self) -> std::result::Result<(), HciError> {
        let len = self.transport.receive(Pipe::Event, &mut self.hci_buf)?;
        if len == 0 {
            return Ok(());
        }
        let len = len.min(self.hci_buf.len());
        trace!("event {}", hex::encode(&self.hci_buf[..len]));
        match Event::parse(&self.hci_buf[..len]) {
            Ok(event) => self.handle_event(event),
            Err(e) => warn!("dropping malformed event: {}", e),
        }
        Ok(())
    }

    fn poll_acl(&mut self) {
        let len = match self.transport.receive(Pipe::AclIn, &mut self.acl_buf) {
            Ok(len) => len.min(self.acl_buf.len()),
            Err(e) => {
                warn!("ACL pipe: {}", e);
                0
            }
        };

        let data = &self.acl_buf[..len];
        let mut ctx = ServiceContext::new(
            &mut self.transport,
            &mut self.commands,
            &self.link,
            self.now,
            self.config.send_retry_delay,
        );
        for service in self.services.iter_mut() {
            if !data.is_empty() {
                service.on_acl_data(data, &mut ctx);
            }
            service.run(&mut ctx);
        }
    }

    fn zero_buffers(&mut self) {
        self.hci_buf.fill(0);
        self.acl_buf.fill(0);
    }

    /// Write a command, or queue it behind the outstanding one.
    fn send(&mut self, command: HciCommand) -> bool {
        let opcode = command.opcode();
        self.flags.clear(HciFlags::CMD_COMPLETE);
        match self.commands.issue(&mut self.transport, command, self.now) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to send opcode 0x{:04X}: {}", opcode, e);
                false
            }
        }
    }

    fn notify_disconnect(&mut self) {
        let mut ctx = ServiceContext::new(
            &mut self.transport,
            &mut self.commands,
            &self.link,
            self.now,
            self.config.send_retry_delay,
        );
        for service in self.services.iter_mut() {
            service.on_disconnect(&mut ctx);
        }
    }

    /// Add a profile service. At most [`MAX_SERVICES`] may be registered.
    pub fn register_service(&mut self, service: Box<dyn BluetoothService>) -> Result<usize> {
        let slot = self.services.register(service)?;
        debug!("registered service in slot {}", slot);
        Ok(slot)
    }

    /// Drop the stored link key so the next scan cycle pairs again. The
    /// target address is kept and still filters inquiry results.
    pub fn pair_with_hid_device(&mut self) {
        self.config.link_key = LinkKey::ZERO;
        self.link.pair_with_hid_device = true;
        if self.init_complete && self.link.hci_handle == 0 {
            self.link.start_scan_inquiry = true;
        }
    }

    /// Point the link manager at `addr`, forgetting any key for another device.
    pub fn set_target(&mut self, addr: BdAddr) {
        if addr != self.config.target {
            self.config.link_key = LinkKey::ZERO;
        }
        self.config.target = addr;
    }

    /// Forget the bonded device entirely.
    pub fn forget_bond(&mut self) {
        self.config.target = BdAddr::ZERO;
        self.config.link_key = LinkKey::ZERO;
        self.pending_bond = None;
    }

    /// Ask services to close their channels, then drop the ACL link.
    pub fn disconnect(&mut self) {
        self.notify_disconnect();
        let handle = self.link.hci_handle;
        if handle != 0 {
            self.send(HciCommand::Disconnect {
                handle,
                reason: HCI_OE_USER_ENDED_CONNECTION,
            });
        }
    }

    /// A new bond from the last Link Key Notification, once.
    pub fn take_bond_update(&mut self) -> Option<(BdAddr, LinkKey)> {
        self.pending_bond.take()
    }

    pub fn status(&self) -> BtStatus {
        self.status
    }

    pub fn init_state(&self) -> InitState {
        self.init_state
    }

    /// Bring-up finished and the transport is attached.
    pub fn is_ready(&self) -> bool {
        self.poll_enabled && self.init_complete
    }

    pub fn hci_handle(&self) -> u16 {
        self.link.hci_handle
    }

    pub fn connected_address(&self) -> BdAddr {
        self.link.connected_addr
    }

    pub fn target(&self) -> BdAddr {
        self.config.target
    }

    pub fn link_key(&self) -> LinkKey {
        self.config.link_key
    }

    pub fn local_address(&self) -> BdAddr {
        self.local_addr
    }

    pub fn remote_name(&self) -> &str {
        &self.link.remote_name
    }

    pub fn flags(&self) -> &FlagRegister {
        &self.flags
    }

    pub fn retry_count(&self) -> u8 {
        self.commands.retry_count()
    }

    pub fn inquiry_rounds(&self) -> u8 {
        self.link.inquiry_rounds
    }

    pub fn pending_command(&self) -> Option<PendingCommand> {
        self.commands.pending()
    }

    pub fn link(&self) -> &LinkState {
        &self.link
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
