//! Reactions to decoded HCI events.

use super::{BtStatus, Controller, HciFlags, Transport};
use crate::gap::{BdAddr, ClassOfDevice, LinkKey};
use crate::hci::constants::{
    HCI_OE_USER_ENDED_CONNECTION, HCI_REJECTED_UNACCEPTABLE_BDADDR, HCI_SUCCESS, LMP_FEATURE_ENCRYPTION,
    LMP_FEATURE_EXTENDED, ROLE_BECOME_MASTER,
};
use crate::hci::{Event, HciCommand};
use log::{debug, info, trace, warn};

impl<T: Transport> Controller<T> {
    pub(super) fn handle_event(&mut self, event: Event) {
        trace!("{:?}", event);
        match event {
            Event::CommandComplete {
                opcode,
                status,
                return_parameters,
                ..
            } => self.on_command_complete(opcode, status, &return_parameters),
            Event::CommandStatus { status, opcode, .. } => {
                if status != HCI_SUCCESS {
                    warn!("opcode 0x{:04X} rejected with status 0x{:02X}", opcode, status);
                }
                if self.commands.resolve(opcode) {
                    self.commands.flush(&mut self.transport, self.now);
                }
            }

            Event::InquiryComplete { status } => self.on_inquiry_complete(status),
            Event::InquiryResult(responses) => self.on_inquiry_result(&responses),

            Event::ConnectionRequest {
                bd_addr,
                class_of_device,
                ..
            } => self.on_connection_request(bd_addr, class_of_device),
            Event::ConnectionComplete {
                status,
                handle,
                bd_addr,
                ..
            } => self.on_connection_complete(status, handle, bd_addr),
            Event::DisconnectionComplete { status, handle, reason } => {
                self.on_disconnection_complete(status, handle, reason)
            }

            Event::AuthenticationComplete { status, handle } => self.on_authentication_complete(status, handle),
            Event::RemoteNameRequestComplete { status, bd_addr, name } => {
                self.on_remote_name_complete(status, bd_addr, name)
            }
            Event::ReadRemoteSupportedFeaturesComplete {
                status,
                handle,
                features,
            } => self.on_features_complete(status, handle, &features),
            Event::ReadRemoteExtendedFeaturesComplete {
                status, page, features, ..
            } => {
                debug!("extended features page {}: status 0x{:02X} {}", page, status, hex::encode(features));
            }
            Event::EncryptionChange { status, handle, enabled } => {
                debug!(
                    "encryption on handle 0x{:03X}: {} (status 0x{:02X})",
                    handle, enabled, status
                );
            }

            Event::LinkKeyRequest { bd_addr } => self.on_link_key_request(bd_addr),
            Event::LinkKeyNotification {
                bd_addr,
                link_key,
                key_type,
            } => self.on_link_key_notification(bd_addr, link_key, key_type),
            Event::PinCodeRequest { bd_addr } => {
                // Legacy PIN pairing is not offered
                warn!("ignoring PIN code request from {}", bd_addr);
            }
            Event::IoCapabilityRequest { bd_addr } => {
                debug!("IO capability request from {}", bd_addr);
                self.send(HciCommand::io_capability_reply(bd_addr));
            }
            Event::IoCapabilityResponse {
                bd_addr,
                io_capability,
                authentication_requirements,
                ..
            } => {
                debug!(
                    "{} IO capability 0x{:02X}, authentication 0x{:02X}",
                    bd_addr, io_capability, authentication_requirements
                );
            }
            Event::UserConfirmationRequest { bd_addr, numeric_value } => {
                debug!("confirming pairing with {} ({:06})", bd_addr, numeric_value);
                self.send(HciCommand::UserConfirmationRequestReply { bd_addr });
            }
            Event::SimplePairingComplete { status, bd_addr } => {
                if status == HCI_SUCCESS {
                    info!("simple pairing with {} complete", bd_addr);
                } else {
                    warn!("simple pairing with {} failed: 0x{:02X}", bd_addr, status);
                    self.drop_link();
                }
            }

            Event::Ignored(code) => trace!("ignoring event {:?}", code),
        }
    }

    fn on_command_complete(&mut self, opcode: u16, status: u8, return_parameters: &[u8]) {
        let resolved = self.commands.resolve(opcode);

        if !self.init_complete {
            // Completions for anything but the outstanding bring-up step are noise
            if resolved {
                self.init_command_complete(status, return_parameters);
            }
        } else if status == HCI_SUCCESS {
            self.flags.set(HciFlags::CMD_COMPLETE);
        } else {
            warn!("opcode 0x{:04X} failed with status 0x{:02X}", opcode, status);
        }

        if resolved {
            self.commands.flush(&mut self.transport, self.now);
        }
    }

    fn on_connection_request(&mut self, bd_addr: BdAddr, class_of_device: ClassOfDevice) {
        info!("connection request from {} (class {})", bd_addr, class_of_device);
        self.link.peer_addr = bd_addr;
        if class_of_device.is_hid_peripheral() {
            self.link.incoming_hid_device = true;
        }

        if bd_addr == self.config.target {
            self.flags.set(HciFlags::INCOMING_REQUEST);
            self.flags.clear(HciFlags::CONNECT_COMPLETE);
            self.status = BtStatus::ConnectInProgress;
            self.send(HciCommand::AcceptConnectionRequest {
                bd_addr,
                role: ROLE_BECOME_MASTER,
            });
        } else {
            debug!("rejecting {}: not the bonded device", bd_addr);
            self.link.incoming_hid_device = false;
            self.flags.clear(HciFlags::CONNECT_COMPLETE);
            self.send(HciCommand::RejectConnectionRequest {
                bd_addr,
                reason: HCI_REJECTED_UNACCEPTABLE_BDADDR,
            });
        }
    }

    fn on_connection_complete(&mut self, status: u8, handle: u16, bd_addr: BdAddr) {
        self.flags.set(HciFlags::CONNECT_EVENT);
        if status != HCI_SUCCESS {
            warn!("connection to {} failed: 0x{:02X}", bd_addr, status);
            self.link.start_scan_inquiry = true;
            return;
        }

        info!("ACL link to {} up on handle 0x{:03X}", bd_addr, handle);
        self.link.hci_handle = handle;
        self.link.connected_addr = bd_addr;
        self.config.target = bd_addr;
        self.link.waiting_for_connection = false;
        self.send(HciCommand::RemoteNameRequest { bd_addr });
    }

    fn on_disconnection_complete(&mut self, status: u8, handle: u16, reason: u8) {
        if status != HCI_SUCCESS || handle != self.link.hci_handle {
            debug!("disconnection of handle 0x{:03X} is not ours", handle);
            return;
        }
        info!("handle 0x{:03X} disconnected, reason 0x{:02X}", handle, reason);
        self.link.hci_handle = 0;
        self.link.connected_addr = BdAddr::ZERO;
        self.flags.set(HciFlags::DISCONNECT_COMPLETE);
        self.flags.clear(HciFlags::CONNECT_COMPLETE);
    }

    fn on_authentication_complete(&mut self, status: u8, handle: u16) {
        if status != HCI_SUCCESS {
            warn!("authentication on handle 0x{:03X} failed: 0x{:02X}", handle, status);
            self.drop_link();
            return;
        }

        debug!("authenticated handle 0x{:03X}", handle);
        if self.link.pair_with_hid_device && !self.link.connected_to_hid {
            self.link.pair_with_hid_device = false;
            self.link.connected_to_hid = true;
        }
        if self.link.encryption_eligible {
            self.send(HciCommand::SetConnectionEncryption {
                handle: self.link.hci_handle,
                enable: true,
            });
        }
        self.flags.set(HciFlags::CONNECT_COMPLETE);
    }

    fn on_remote_name_complete(&mut self, status: u8, bd_addr: BdAddr, name: String) {
        if status != HCI_SUCCESS {
            debug!("remote name request for {} failed: 0x{:02X}", bd_addr, status);
            return;
        }

        info!("remote name: {}", name);
        self.link.remote_name = name;
        self.flags.set(HciFlags::REMOTE_NAME_COMPLETE);

        let handle = self.link.hci_handle;
        self.link.encryption_eligible = false;
        self.send(HciCommand::ReadRemoteSupportedFeatures { handle });
        self.send(HciCommand::AuthenticationRequested { handle });
    }

    fn on_features_complete(&mut self, status: u8, handle: u16, features: &[u8; 8]) {
        if status != HCI_SUCCESS {
            return;
        }
        let (byte, mask) = LMP_FEATURE_EXTENDED;
        if features[byte] & mask != 0 {
            self.send(HciCommand::ReadRemoteExtendedFeatures { handle, page: 1 });
        }
        let (byte, mask) = LMP_FEATURE_ENCRYPTION;
        if features[byte] & mask != 0 {
            debug!("handle 0x{:03X} supports encryption", handle);
            self.link.encryption_eligible = true;
        }
    }

    fn on_link_key_request(&mut self, bd_addr: BdAddr) {
        if !self.link.pair_with_hid_device || self.link.incoming_hid_device {
            debug!("supplying stored link key for {}", bd_addr);
            self.send(HciCommand::LinkKeyRequestReply {
                bd_addr,
                link_key: self.config.link_key,
            });
        } else {
            debug!("no link key for {}, forcing pairing", bd_addr);
            self.send(HciCommand::LinkKeyRequestNegativeReply { bd_addr });
        }
    }

    fn on_link_key_notification(&mut self, bd_addr: BdAddr, link_key: LinkKey, key_type: u8) {
        info!("new link key for {} (type 0x{:02X})", bd_addr, key_type);
        self.config.target = bd_addr;
        self.config.link_key = link_key;
        self.flags.set(HciFlags::LINK_KEY_UPDATED);
        self.link.link_key_notified = true;
        self.pending_bond = Some((bd_addr, link_key));
    }

    fn drop_link(&mut self) {
        self.flags.clear(HciFlags::DISCONNECT_COMPLETE);
        self.send(HciCommand::Disconnect {
            handle: self.link.hci_handle,
            reason: HCI_OE_USER_ENDED_CONNECTION,
        });
    }
}
