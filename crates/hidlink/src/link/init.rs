//! Controller bring-up: one command per state, advancing on its Command Complete.

use super::{BtStatus, Controller, HciFlags, InitState, Transport};
use crate::gap::constants::LOCAL_CLASS_OF_DEVICE;
use crate::gap::{BdAddr, ClassOfDevice};
use crate::hci::constants::{DEFAULT_EVENT_MASK, HCI_SUCCESS};
use crate::hci::HciCommand;
use log::{debug, info, warn};

impl<T: Transport> Controller<T> {
    pub(super) fn run_init(&mut self) {
        if self.init_state == InitState::Error {
            self.restart_init();
            return;
        }

        self.status = BtStatus::Init;
        if !self.init_step_ready {
            return;
        }
        self.init_step_ready = false;

        // Skipped steps advance within the same tick
        loop {
            match self.init_command(self.init_state) {
                Some(command) => {
                    debug!("init step {:?}", self.init_state);
                    if !self.send(command) {
                        self.init_step_failed();
                    }
                    return;
                }
                None if self.init_state == InitState::Complete => {
                    info!("controller initialized, local address {}", self.local_addr);
                    self.init_complete = true;
                    self.link.start_scan_inquiry = true;
                    return;
                }
                None => {
                    debug!("skipping init step {:?}", self.init_state);
                    self.init_state = self.init_state.next();
                }
            }
        }
    }

    /// Command for `state`, or `None` when the state sends nothing.
    fn init_command(&self, state: InitState) -> Option<HciCommand> {
        match state {
            InitState::Reset => Some(HciCommand::Reset),
            InitState::ReadLocalAddress => Some(HciCommand::ReadBdAddr),
            InitState::WriteClassOfDevice => Some(HciCommand::WriteClassOfDevice {
                class: ClassOfDevice(LOCAL_CLASS_OF_DEVICE),
            }),
            InitState::WriteLocalName => match self.config.local_name.as_deref() {
                Some(name) if !name.is_empty() => Some(HciCommand::WriteLocalName {
                    name: name.to_string(),
                }),
                _ => None,
            },
            InitState::WriteSimplePairingMode => Some(HciCommand::WriteSimplePairingMode { enabled: true }),
            InitState::SetEventMask => Some(HciCommand::SetEventMask {
                event_mask: DEFAULT_EVENT_MASK,
            }),
            InitState::Complete | InitState::Error => None,
        }
    }

    fn restart_init(&mut self) {
        warn!("controller bring-up failed, restarting from reset");
        self.status = BtStatus::Error;
        self.commands.clear();
        self.commands.reset_retries();
        self.init_state = InitState::Reset;
        self.init_step_ready = false;
        if !self.send(HciCommand::Reset) {
            self.init_step_failed();
        }
    }

    /// Command Complete for the outstanding bring-up command.
    pub(super) fn init_command_complete(&mut self, status: u8, return_parameters: &[u8]) {
        if status != HCI_SUCCESS {
            warn!("init step {:?} failed with status 0x{:02X}", self.init_state, status);
            self.init_step_failed();
            return;
        }

        if self.init_state == InitState::ReadLocalAddress {
            if let Some(addr) = return_parameters.get(..6).and_then(BdAddr::from_slice) {
                self.local_addr = addr;
                self.flags.set(HciFlags::READ_BDADDR);
                debug!("local address {}", addr);
            }
        }

        self.commands.reset_retries();
        self.init_state = self.init_state.next();
        self.init_step_ready = true;
    }

    /// Count a failure of the current step; re-issue it next tick or give up.
    pub(super) fn init_step_failed(&mut self) {
        let retries = self.commands.record_failure();
        if retries > self.config.command_retry_max {
            warn!("init step {:?} failed {} times", self.init_state, retries);
            self.init_state = InitState::Error;
        } else {
            self.init_step_ready = true;
        }
    }
}
