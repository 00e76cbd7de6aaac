//! Scan-or-inquire decisions once the controller is up.
//!
//! Without a stored link key the host inquires and pages the first device
//! that matches (by address when a target is stored, by class otherwise).
//! With a key it turns on page scan and waits for the bonded device to
//! connect.

use super::{BtStatus, Controller, HciFlags, Transport};
use crate::gap::ScanEnable;
use crate::hci::constants::HCI_SUCCESS;
use crate::hci::{HciCommand, InquiryResponse};
use log::{debug, info, warn};

impl<T: Transport> Controller<T> {
    pub(super) fn run_link_manager(&mut self) {
        if self.link.start_scan_inquiry {
            self.link.start_scan_inquiry = false;
            self.select_scan_mode();
            self.scan_or_inquire();
        }

        if self.flags.check(HciFlags::CONNECT_COMPLETE) {
            info!("connected to {}", self.link.connected_addr);
            self.link.connected_to_hid = true;
            self.status = BtStatus::Connected;
            self.flags.reset();
        }

        if self.flags.check(HciFlags::DISCONNECT_COMPLETE) {
            info!("link down, returning to scan/inquiry");
            self.notify_disconnect();
            self.flags.reset();
            self.zero_buffers();
            self.link.connected_to_hid = false;
            self.link.incoming_hid_device = false;
            self.link.link_key_notified = false;
            self.link.start_scan_inquiry = true;
        }
    }

    fn select_scan_mode(&mut self) {
        self.link.connect_address_is_set = !self.config.target.is_zero();
        self.link.pair_with_hid_device = self.config.link_key.is_zero();
        debug!(
            "target set: {}, pairing: {}",
            self.link.connect_address_is_set, self.link.pair_with_hid_device
        );
    }

    fn scan_or_inquire(&mut self) {
        if self.link.pair_with_hid_device {
            info!("inquiring for a device to pair with");
            self.status = BtStatus::PairingWait;
            self.flags.clear(HciFlags::HID_DEVICE_FOUND);
            self.link.inquiry_rounds = 0;
            self.send(HciCommand::general_inquiry());
        } else {
            info!("waiting for {} to connect", self.config.target);
            self.status = BtStatus::ConnectWait;
            self.link.waiting_for_connection = true;
            self.flags.clear(HciFlags::INCOMING_REQUEST);
            let scan = match self.config.local_name.as_deref() {
                Some(name) if !name.is_empty() => ScanEnable::InquiryAndPage,
                _ => ScanEnable::PageOnly,
            };
            self.send(HciCommand::WriteScanEnable { scan });
        }
    }

    pub(super) fn on_inquiry_result(&mut self, responses: &[InquiryResponse]) {
        if self.flags.check(HciFlags::HID_DEVICE_FOUND) {
            return;
        }

        let matched = responses.iter().find(|response| {
            if self.link.connect_address_is_set {
                response.bd_addr == self.config.target
            } else {
                self.link.pair_with_hid_device && response.class_of_device.is_hid_peripheral()
            }
        });
        let Some(found) = matched.copied() else {
            debug!("{} inquiry responses, no match", responses.len());
            return;
        };

        info!("found {} (class {}), connecting", found.bd_addr, found.class_of_device);
        self.link.peer_addr = found.bd_addr;
        self.flags.set(HciFlags::HID_DEVICE_FOUND);
        self.send(HciCommand::InquiryCancel);
        self.flags.clear(HciFlags::CONNECT_COMPLETE | HciFlags::CONNECT_EVENT);
        self.send(HciCommand::create_connection(found.bd_addr));
        self.status = BtStatus::PairingInProgress;
    }

    pub(super) fn on_inquiry_complete(&mut self, status: u8) {
        if status != HCI_SUCCESS {
            warn!("inquiry ended with status 0x{:02X}", status);
        }
        if !self.link.pair_with_hid_device || self.flags.check(HciFlags::HID_DEVICE_FOUND) {
            return;
        }

        self.link.inquiry_rounds = self.link.inquiry_rounds.saturating_add(1);
        if self.link.inquiry_rounds > self.config.inquiry_rounds_max {
            info!("no device found after {} inquiries, starting over", self.link.inquiry_rounds);
            self.link.inquiry_rounds = 0;
            self.link.connected_to_hid = false;
            self.link.start_scan_inquiry = true;
        } else {
            debug!("inquiry round {} found nothing", self.link.inquiry_rounds);
            self.send(HciCommand::general_inquiry());
        }
    }
}
