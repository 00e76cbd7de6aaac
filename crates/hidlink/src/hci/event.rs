//! Typed decoding of the BR/EDR events the link manager reacts to
//!
//! Every event code the controller may deliver maps to an [`EventCode`];
//! codes outside that set are reported as [`EventCode::Unknown`] and ignored.

use crate::error::HciError;
use crate::gap::{BdAddr, ClassOfDevice, LinkKey, LINK_KEY_SIZE, MAX_REMOTE_NAME_LEN};
use crate::hci::constants::*;
use crate::hci::packet::HciEvent;
use byteorder::{ByteOrder, LittleEndian};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCode {
    InquiryComplete,
    InquiryResult,
    ConnectionComplete,
    ConnectionRequest,
    DisconnectionComplete,
    AuthenticationComplete,
    RemoteNameRequestComplete,
    EncryptionChange,
    ChangeConnectionLinkKeyComplete,
    ReadRemoteSupportedFeaturesComplete,
    ReadRemoteVersionComplete,
    QosSetupComplete,
    CommandComplete,
    CommandStatus,
    HardwareError,
    RoleChange,
    NumberOfCompletedPackets,
    ModeChange,
    ReturnLinkKeys,
    PinCodeRequest,
    LinkKeyRequest,
    LinkKeyNotification,
    LoopbackCommand,
    DataBufferOverflow,
    MaxSlotsChange,
    PageScanRepetitionModeChange,
    InquiryResultWithRssi,
    ReadRemoteExtendedFeaturesComplete,
    ExtendedInquiryResult,
    IoCapabilityRequest,
    IoCapabilityResponse,
    UserConfirmationRequest,
    SimplePairingComplete,
    Unknown(u8),
}

impl From<u8> for EventCode {
    fn from(code: u8) -> Self {
        match code {
            EVT_INQUIRY_COMPLETE => Self::InquiryComplete,
            EVT_INQUIRY_RESULT => Self::InquiryResult,
            EVT_CONN_COMPLETE => Self::ConnectionComplete,
            EVT_CONN_REQUEST => Self::ConnectionRequest,
            EVT_DISCONN_COMPLETE => Self::DisconnectionComplete,
            EVT_AUTH_COMPLETE => Self::AuthenticationComplete,
            EVT_REMOTE_NAME_REQ_COMPLETE => Self::RemoteNameRequestComplete,
            EVT_ENCRYPTION_CHANGE => Self::EncryptionChange,
            EVT_CHANGE_CONN_LINK_KEY_COMPLETE => Self::ChangeConnectionLinkKeyComplete,
            EVT_READ_REMOTE_FEATURES_COMPLETE => Self::ReadRemoteSupportedFeaturesComplete,
            EVT_READ_REMOTE_VERSION_COMPLETE => Self::ReadRemoteVersionComplete,
            EVT_QOS_SETUP_COMPLETE => Self::QosSetupComplete,
            EVT_CMD_COMPLETE => Self::CommandComplete,
            EVT_CMD_STATUS => Self::CommandStatus,
            EVT_HARDWARE_ERROR => Self::HardwareError,
            EVT_ROLE_CHANGE => Self::RoleChange,
            EVT_NUM_COMP_PKTS => Self::NumberOfCompletedPackets,
            EVT_MODE_CHANGE => Self::ModeChange,
            EVT_RETURN_LINK_KEYS => Self::ReturnLinkKeys,
            EVT_PIN_CODE_REQ => Self::PinCodeRequest,
            EVT_LINK_KEY_REQ => Self::LinkKeyRequest,
            EVT_LINK_KEY_NOTIFY => Self::LinkKeyNotification,
            EVT_LOOPBACK_COMMAND => Self::LoopbackCommand,
            EVT_DATA_BUFFER_OVERFLOW => Self::DataBufferOverflow,
            EVT_MAX_SLOTS_CHANGE => Self::MaxSlotsChange,
            EVT_PSCAN_REP_MODE_CHANGE => Self::PageScanRepetitionModeChange,
            EVT_INQUIRY_RESULT_WITH_RSSI => Self::InquiryResultWithRssi,
            EVT_READ_REMOTE_EXT_FEATURES_COMPLETE => Self::ReadRemoteExtendedFeaturesComplete,
            EVT_EXTENDED_INQUIRY_RESULT => Self::ExtendedInquiryResult,
            EVT_IO_CAPABILITY_REQUEST => Self::IoCapabilityRequest,
            EVT_IO_CAPABILITY_RESPONSE => Self::IoCapabilityResponse,
            EVT_USER_CONFIRM_REQUEST => Self::UserConfirmationRequest,
            EVT_SIMPLE_PAIRING_COMPLETE => Self::SimplePairingComplete,
            other => Self::Unknown(other),
        }
    }
}

/// One response from any of the three inquiry result events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InquiryResponse {
    pub bd_addr: BdAddr,
    pub class_of_device: ClassOfDevice,
}

/// A decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InquiryComplete { status: u8 },
    InquiryResult(Vec<InquiryResponse>),
    ConnectionComplete { status: u8, handle: u16, bd_addr: BdAddr, link_type: u8 },
    ConnectionRequest { bd_addr: BdAddr, class_of_device: ClassOfDevice, link_type: u8 },
    DisconnectionComplete { status: u8, handle: u16, reason: u8 },
    AuthenticationComplete { status: u8, handle: u16 },
    RemoteNameRequestComplete { status: u8, bd_addr: BdAddr, name: String },
    EncryptionChange { status: u8, handle: u16, enabled: bool },
    ReadRemoteSupportedFeaturesComplete { status: u8, handle: u16, features: [u8; 8] },
    ReadRemoteExtendedFeaturesComplete { status: u8, handle: u16, page: u8, max_page: u8, features: [u8; 8] },
    CommandComplete { num_packets: u8, opcode: u16, status: u8, return_parameters: Vec<u8> },
    CommandStatus { status: u8, num_packets: u8, opcode: u16 },
    PinCodeRequest { bd_addr: BdAddr },
    LinkKeyRequest { bd_addr: BdAddr },
    LinkKeyNotification { bd_addr: BdAddr, link_key: LinkKey, key_type: u8 },
    IoCapabilityRequest { bd_addr: BdAddr },
    IoCapabilityResponse { bd_addr: BdAddr, io_capability: u8, oob_data_present: u8, authentication_requirements: u8 },
    UserConfirmationRequest { bd_addr: BdAddr, numeric_value: u32 },
    SimplePairingComplete { status: u8, bd_addr: BdAddr },
    /// Recognised but not acted on
    Ignored(EventCode),
}

fn require(event: &HciEvent, expected: usize) -> Result<&[u8], HciError> {
    if event.parameters.len() < expected {
        return Err(HciError::TruncatedEvent {
            code: event.event_code,
            expected,
            actual: event.parameters.len(),
        });
    }
    Ok(&event.parameters)
}

fn addr_at(params: &[u8], offset: usize) -> BdAddr {
    BdAddr::from_slice(&params[offset..]).unwrap_or_default()
}

fn features_at(params: &[u8], offset: usize) -> [u8; 8] {
    let mut features = [0u8; 8];
    features.copy_from_slice(&params[offset..offset + 8]);
    features
}

/// Per-response field widths of the inquiry result variants:
/// address, page scan repetition mode, reserved, class of device, clock offset, RSSI
fn inquiry_responses(event: &HciEvent, reserved: usize, rssi: usize) -> Result<Vec<InquiryResponse>, HciError> {
    let params = require(event, 1)?;
    let count = params[0] as usize;
    let stride = 6 + 1 + reserved + 3 + 2 + rssi;
    let params = require(event, 1 + count * stride)?;

    let class_base = 1 + count * (6 + 1 + reserved);
    let responses = (0..count)
        .map(|i| InquiryResponse {
            bd_addr: addr_at(params, 1 + 6 * i),
            class_of_device: ClassOfDevice::from_slice(&params[class_base + 3 * i..]).unwrap_or_default(),
        })
        .collect();

    Ok(responses)
}

impl Event {
    /// Decode a raw event into its typed form
    pub fn decode(event: &HciEvent) -> Result<Self, HciError> {
        let code = EventCode::from(event.event_code);
        let decoded = match code {
            EventCode::InquiryComplete => {
                let p = require(event, 1)?;
                Self::InquiryComplete { status: p[0] }
            }
            EventCode::InquiryResult => Self::InquiryResult(inquiry_responses(event, 2, 0)?),
            EventCode::InquiryResultWithRssi => Self::InquiryResult(inquiry_responses(event, 1, 1)?),
            EventCode::ExtendedInquiryResult => {
                // Single response followed by 240 bytes of EIR data
                let p = require(event, 15)?;
                Self::InquiryResult(vec![InquiryResponse {
                    bd_addr: addr_at(p, 1),
                    class_of_device: ClassOfDevice::from_slice(&p[9..]).unwrap_or_default(),
                }])
            }
            EventCode::ConnectionComplete => {
                let p = require(event, 10)?;
                Self::ConnectionComplete {
                    status: p[0],
                    handle: LittleEndian::read_u16(&p[1..3]) & CONN_HANDLE_MASK,
                    bd_addr: addr_at(p, 3),
                    link_type: p[9],
                }
            }
            EventCode::ConnectionRequest => {
                let p = require(event, 10)?;
                Self::ConnectionRequest {
                    bd_addr: addr_at(p, 0),
                    class_of_device: ClassOfDevice::from_slice(&p[6..]).unwrap_or_default(),
                    link_type: p[9],
                }
            }
            EventCode::DisconnectionComplete => {
                let p = require(event, 4)?;
                Self::DisconnectionComplete {
                    status: p[0],
                    handle: LittleEndian::read_u16(&p[1..3]) & CONN_HANDLE_MASK,
                    reason: p[3],
                }
            }
            EventCode::AuthenticationComplete => {
                let p = require(event, 3)?;
                Self::AuthenticationComplete {
                    status: p[0],
                    handle: LittleEndian::read_u16(&p[1..3]) & CONN_HANDLE_MASK,
                }
            }
            EventCode::RemoteNameRequestComplete => {
                let p = require(event, 7)?;
                let raw = &p[7..];
                let raw = &raw[..raw.len().min(MAX_REMOTE_NAME_LEN)];
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                Self::RemoteNameRequestComplete {
                    status: p[0],
                    bd_addr: addr_at(p, 1),
                    name: String::from_utf8_lossy(&raw[..end]).into_owned(),
                }
            }
            EventCode::EncryptionChange => {
                let p = require(event, 4)?;
                Self::EncryptionChange {
                    status: p[0],
                    handle: LittleEndian::read_u16(&p[1..3]) & CONN_HANDLE_MASK,
                    enabled: p[3] != 0,
                }
            }
            EventCode::ReadRemoteSupportedFeaturesComplete => {
                let p = require(event, 11)?;
                Self::ReadRemoteSupportedFeaturesComplete {
                    status: p[0],
                    handle: LittleEndian::read_u16(&p[1..3]) & CONN_HANDLE_MASK,
                    features: features_at(p, 3),
                }
            }
            EventCode::ReadRemoteExtendedFeaturesComplete => {
                let p = require(event, 13)?;
                Self::ReadRemoteExtendedFeaturesComplete {
                    status: p[0],
                    handle: LittleEndian::read_u16(&p[1..3]) & CONN_HANDLE_MASK,
                    page: p[3],
                    max_page: p[4],
                    features: features_at(p, 5),
                }
            }
            EventCode::CommandComplete => {
                let p = require(event, 3)?;
                Self::CommandComplete {
                    num_packets: p[0],
                    opcode: LittleEndian::read_u16(&p[1..3]),
                    // Opcode 0x0000 (credit update) carries no status
                    status: p.get(3).copied().unwrap_or(HCI_SUCCESS),
                    return_parameters: p.get(4..).map(<[u8]>::to_vec).unwrap_or_default(),
                }
            }
            EventCode::CommandStatus => {
                let p = require(event, 4)?;
                Self::CommandStatus {
                    status: p[0],
                    num_packets: p[1],
                    opcode: LittleEndian::read_u16(&p[2..4]),
                }
            }
            EventCode::PinCodeRequest => Self::PinCodeRequest { bd_addr: addr_at(require(event, 6)?, 0) },
            EventCode::LinkKeyRequest => Self::LinkKeyRequest { bd_addr: addr_at(require(event, 6)?, 0) },
            EventCode::LinkKeyNotification => {
                let p = require(event, 6 + LINK_KEY_SIZE + 1)?;
                Self::LinkKeyNotification {
                    bd_addr: addr_at(p, 0),
                    link_key: LinkKey::from_slice(&p[6..]).unwrap_or_default(),
                    key_type: p[6 + LINK_KEY_SIZE],
                }
            }
            EventCode::IoCapabilityRequest => {
                Self::IoCapabilityRequest { bd_addr: addr_at(require(event, 6)?, 0) }
            }
            EventCode::IoCapabilityResponse => {
                let p = require(event, 9)?;
                Self::IoCapabilityResponse {
                    bd_addr: addr_at(p, 0),
                    io_capability: p[6],
                    oob_data_present: p[7],
                    authentication_requirements: p[8],
                }
            }
            EventCode::UserConfirmationRequest => {
                let p = require(event, 10)?;
                Self::UserConfirmationRequest {
                    bd_addr: addr_at(p, 0),
                    numeric_value: LittleEndian::read_u32(&p[6..10]),
                }
            }
            EventCode::SimplePairingComplete => {
                let p = require(event, 7)?;
                Self::SimplePairingComplete { status: p[0], bd_addr: addr_at(p, 1) }
            }
            EventCode::ChangeConnectionLinkKeyComplete
            | EventCode::ReadRemoteVersionComplete
            | EventCode::QosSetupComplete
            | EventCode::HardwareError
            | EventCode::RoleChange
            | EventCode::NumberOfCompletedPackets
            | EventCode::ModeChange
            | EventCode::ReturnLinkKeys
            | EventCode::LoopbackCommand
            | EventCode::DataBufferOverflow
            | EventCode::MaxSlotsChange
            | EventCode::PageScanRepetitionModeChange
            | EventCode::Unknown(_) => Self::Ignored(code),
        };

        Ok(decoded)
    }

    /// Parse raw `code | length | parameters` bytes and decode them
    pub fn parse(data: &[u8]) -> Result<Self, HciError> {
        let event = HciEvent::parse(data).ok_or(HciError::InvalidPacketFormat)?;
        Self::decode(&event)
    }
}
