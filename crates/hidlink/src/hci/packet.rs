//! HCI packet structures and parsing
//!
//! This module contains structures and methods for handling HCI packets.

use crate::gap::{BdAddr, ClassOfDevice, LinkKey, ScanEnable, GIAC_LAP, INQUIRY_LENGTH, INQUIRY_MAX_RESPONSES};
use crate::hci::constants::*;

/// Compose an opcode from its group and command fields
pub const fn opcode(ogf: u8, ocf: u16) -> u16 {
    ((ogf as u16) << 10) | (ocf & 0x3ff)
}

/// BR/EDR HCI commands issued by the link manager
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HciCommand {
    // Link Control Commands (OGF: 0x01)
    Inquiry { lap: [u8; 3], length: u8, num_responses: u8 },
    InquiryCancel,
    CreateConnection {
        bd_addr: BdAddr,
        packet_type: u16,
        page_scan_repetition_mode: u8,
        clock_offset: u16,
        allow_role_switch: bool,
    },
    Disconnect { handle: u16, reason: u8 },
    AcceptConnectionRequest { bd_addr: BdAddr, role: u8 },
    RejectConnectionRequest { bd_addr: BdAddr, reason: u8 },
    LinkKeyRequestReply { bd_addr: BdAddr, link_key: LinkKey },
    LinkKeyRequestNegativeReply { bd_addr: BdAddr },
    AuthenticationRequested { handle: u16 },
    SetConnectionEncryption { handle: u16, enable: bool },
    RemoteNameRequest { bd_addr: BdAddr },
    ReadRemoteSupportedFeatures { handle: u16 },
    ReadRemoteExtendedFeatures { handle: u16, page: u8 },
    IoCapabilityRequestReply {
        bd_addr: BdAddr,
        io_capability: u8,
        oob_data_present: u8,
        authentication_requirements: u8,
    },
    UserConfirmationRequestReply { bd_addr: BdAddr },

    // Host Controller Commands (OGF: 0x03)
    Reset,
    SetEventMask { event_mask: u64 },
    WriteLocalName { name: String },
    WriteScanEnable { scan: ScanEnable },
    WriteClassOfDevice { class: ClassOfDevice },
    WriteSimplePairingMode { enabled: bool },

    // Informational Parameters (OGF: 0x04)
    ReadBdAddr,

    /// Arbitrary command
    Raw { ogf: u8, ocf: u16, parameters: Vec<u8> },
}

impl HciCommand {
    /// Build an arbitrary command from its opcode parts and parameters
    pub fn new(ogf: u8, ocf: u16, parameters: Vec<u8>) -> Self {
        Self::Raw { ogf, ocf, parameters }
    }

    /// General inquiry using the GIAC with the default length and response limit
    pub fn general_inquiry() -> Self {
        Self::Inquiry {
            lap: GIAC_LAP,
            length: INQUIRY_LENGTH,
            num_responses: INQUIRY_MAX_RESPONSES,
        }
    }

    /// Page a device with the packet types and scan mode a HID host uses
    pub fn create_connection(bd_addr: BdAddr) -> Self {
        Self::CreateConnection {
            bd_addr,
            packet_type: ACL_PACKET_TYPES,
            page_scan_repetition_mode: PAGE_SCAN_REPETITION_R1,
            clock_offset: 0,
            allow_role_switch: false,
        }
    }

    /// Answer an IO Capability Request as a NoInputNoOutput device without MITM or OOB
    pub fn io_capability_reply(bd_addr: BdAddr) -> Self {
        Self::IoCapabilityRequestReply {
            bd_addr,
            io_capability: IO_CAP_NO_INPUT_NO_OUTPUT,
            oob_data_present: OOB_DATA_NOT_PRESENT,
            authentication_requirements: AUTH_REQ_MITM_NOT_REQUIRED,
        }
    }

    /// Get the OGF and OCF for this command
    pub fn opcode_parts(&self) -> (u8, u16) {
        match self {
            // Link Control Commands
            Self::Inquiry { .. } => (OGF_LINK_CTL, OCF_INQUIRY),
            Self::InquiryCancel => (OGF_LINK_CTL, OCF_INQUIRY_CANCEL),
            Self::CreateConnection { .. } => (OGF_LINK_CTL, OCF_CREATE_CONNECTION),
            Self::Disconnect { .. } => (OGF_LINK_CTL, OCF_DISCONNECT),
            Self::AcceptConnectionRequest { .. } => (OGF_LINK_CTL, OCF_ACCEPT_CONNECTION_REQUEST),
            Self::RejectConnectionRequest { .. } => (OGF_LINK_CTL, OCF_REJECT_CONNECTION_REQUEST),
            Self::LinkKeyRequestReply { .. } => (OGF_LINK_CTL, OCF_LINK_KEY_REQUEST_REPLY),
            Self::LinkKeyRequestNegativeReply { .. } => {
                (OGF_LINK_CTL, OCF_LINK_KEY_REQUEST_NEGATIVE_REPLY)
            }
            Self::AuthenticationRequested { .. } => (OGF_LINK_CTL, OCF_AUTHENTICATION_REQUESTED),
            Self::SetConnectionEncryption { .. } => (OGF_LINK_CTL, OCF_SET_CONNECTION_ENCRYPTION),
            Self::RemoteNameRequest { .. } => (OGF_LINK_CTL, OCF_REMOTE_NAME_REQUEST),
            Self::ReadRemoteSupportedFeatures { .. } => {
                (OGF_LINK_CTL, OCF_READ_REMOTE_SUPPORTED_FEATURES)
            }
            Self::ReadRemoteExtendedFeatures { .. } => {
                (OGF_LINK_CTL, OCF_READ_REMOTE_EXTENDED_FEATURES)
            }
            Self::IoCapabilityRequestReply { .. } => (OGF_LINK_CTL, OCF_IO_CAPABILITY_REQUEST_REPLY),
            Self::UserConfirmationRequestReply { .. } => {
                (OGF_LINK_CTL, OCF_USER_CONFIRMATION_REQUEST_REPLY)
            }

            // Host Controller Commands
            Self::Reset => (OGF_HOST_CTL, OCF_RESET),
            Self::SetEventMask { .. } => (OGF_HOST_CTL, OCF_SET_EVENT_MASK),
            Self::WriteLocalName { .. } => (OGF_HOST_CTL, OCF_WRITE_LOCAL_NAME),
            Self::WriteScanEnable { .. } => (OGF_HOST_CTL, OCF_WRITE_SCAN_ENABLE),
            Self::WriteClassOfDevice { .. } => (OGF_HOST_CTL, OCF_WRITE_CLASS_OF_DEVICE),
            Self::WriteSimplePairingMode { .. } => (OGF_HOST_CTL, OCF_WRITE_SIMPLE_PAIRING_MODE),

            // Informational Parameters
            Self::ReadBdAddr => (OGF_INFO_PARAM, OCF_READ_BD_ADDR),

            Self::Raw { ogf, ocf, .. } => (*ogf, *ocf),
        }
    }

    /// The 16-bit opcode, `(OGF << 10) | OCF`
    pub fn opcode(&self) -> u16 {
        let (ogf, ocf) = self.opcode_parts();
        opcode(ogf, ocf)
    }

    /// Convert the command to its raw parameter bytes
    pub fn parameters(&self) -> Vec<u8> {
        match self {
            Self::InquiryCancel | Self::Reset | Self::ReadBdAddr => vec![],

            Self::Inquiry { lap, length, num_responses } => {
                let mut params = Vec::with_capacity(5);
                params.extend_from_slice(lap);
                params.push(*length);
                params.push(*num_responses);
                params
            }

            Self::CreateConnection {
                bd_addr,
                packet_type,
                page_scan_repetition_mode,
                clock_offset,
                allow_role_switch,
            } => {
                let mut params = Vec::with_capacity(13);
                params.extend_from_slice(&bd_addr.bytes);
                params.extend_from_slice(&packet_type.to_le_bytes());
                params.push(*page_scan_repetition_mode);
                params.push(0x00); // reserved
                params.extend_from_slice(&clock_offset.to_le_bytes());
                params.push(*allow_role_switch as u8);
                params
            }

            Self::Disconnect { handle, reason } => {
                let mut params = Vec::with_capacity(3);
                params.extend_from_slice(&(handle & CONN_HANDLE_MASK).to_le_bytes());
                params.push(*reason);
                params
            }

            Self::AcceptConnectionRequest { bd_addr, role } => {
                let mut params = Vec::with_capacity(7);
                params.extend_from_slice(&bd_addr.bytes);
                params.push(*role);
                params
            }

            Self::RejectConnectionRequest { bd_addr, reason } => {
                let mut params = Vec::with_capacity(7);
                params.extend_from_slice(&bd_addr.bytes);
                params.push(*reason);
                params
            }

            Self::LinkKeyRequestReply { bd_addr, link_key } => {
                let mut params = Vec::with_capacity(22);
                params.extend_from_slice(&bd_addr.bytes);
                params.extend_from_slice(link_key.as_bytes());
                params
            }

            Self::LinkKeyRequestNegativeReply { bd_addr }
            | Self::UserConfirmationRequestReply { bd_addr } => bd_addr.bytes.to_vec(),

            Self::RemoteNameRequest { bd_addr } => {
                let mut params = Vec::with_capacity(10);
                params.extend_from_slice(&bd_addr.bytes);
                params.push(PAGE_SCAN_REPETITION_R1);
                params.push(0x00); // reserved
                params.extend_from_slice(&0u16.to_le_bytes()); // clock offset
                params
            }

            Self::AuthenticationRequested { handle }
            | Self::ReadRemoteSupportedFeatures { handle } => handle.to_le_bytes().to_vec(),

            Self::SetConnectionEncryption { handle, enable } => {
                let mut params = Vec::with_capacity(3);
                params.extend_from_slice(&handle.to_le_bytes());
                params.push(*enable as u8);
                params
            }

            Self::ReadRemoteExtendedFeatures { handle, page } => {
                let mut params = Vec::with_capacity(3);
                params.extend_from_slice(&handle.to_le_bytes());
                params.push(*page);
                params
            }

            Self::IoCapabilityRequestReply {
                bd_addr,
                io_capability,
                oob_data_present,
                authentication_requirements,
            } => {
                let mut params = Vec::with_capacity(9);
                params.extend_from_slice(&bd_addr.bytes);
                params.push(*io_capability);
                params.push(*oob_data_present);
                params.push(*authentication_requirements);
                params
            }

            Self::SetEventMask { event_mask } => event_mask.to_le_bytes().to_vec(),

            Self::WriteLocalName { name } => {
                // Fixed 248-byte field, NUL padded
                let mut params = vec![0u8; LOCAL_NAME_SIZE];
                let bytes = name.as_bytes();
                let len = bytes.len().min(LOCAL_NAME_SIZE - 1);
                params[..len].copy_from_slice(&bytes[..len]);
                params
            }

            Self::WriteScanEnable { scan } => vec![u8::from(*scan)],

            Self::WriteClassOfDevice { class } => class.0.to_vec(),

            Self::WriteSimplePairingMode { enabled } => vec![*enabled as u8],

            Self::Raw { parameters, .. } => parameters.clone(),
        }
    }

    /// Encode as `opcode (LE) | parameter length | parameters`, the form a
    /// USB control transfer carries
    pub fn to_bytes(&self) -> Vec<u8> {
        let params = self.parameters();

        let mut bytes = Vec::with_capacity(3 + params.len());
        bytes.extend_from_slice(&self.opcode().to_le_bytes());
        bytes.push(params.len().min(HCI_MAX_PARAM_LEN) as u8);
        bytes.extend_from_slice(&params);
        bytes
    }

    /// Convert the command to a raw HCI packet with its H4 indicator
    pub fn to_packet(&self) -> Vec<u8> {
        let mut packet = vec![HCI_COMMAND_PKT];
        packet.extend_from_slice(&self.to_bytes());
        packet
    }
}

/// HCI Event packet
#[derive(Debug, Clone)]
pub struct HciEvent {
    pub event_code: u8,
    pub parameter_total_length: u8,
    pub parameters: Vec<u8>,
}

impl HciEvent {
    /// Parse an HCI event from raw bytes (`code | length | parameters`)
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }

        let event_code = data[0];
        let parameter_total_length = data[1];

        if data.len() < (parameter_total_length as usize + 2) {
            return None;
        }

        let parameters = data[2..(parameter_total_length as usize + 2)].to_vec();

        Some(HciEvent {
            event_code,
            parameter_total_length,
            parameters,
        })
    }
}
