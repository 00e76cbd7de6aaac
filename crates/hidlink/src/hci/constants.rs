//! HCI protocol constants
//!
//! This module contains constants used in the Bluetooth HCI protocol.

// HCI packet types (H4 indicators)
pub const HCI_COMMAND_PKT: u8 = 0x01;
pub const HCI_ACL_PKT: u8 = 0x02;
pub const HCI_EVENT_PKT: u8 = 0x04;

// Maximum size of HCI command parameters
pub const HCI_MAX_PARAM_LEN: usize = 255;
// Event header (code + length) plus the largest parameter block
pub const HCI_MAX_EVENT_SIZE: usize = 2 + 255;
pub const HCI_MAX_ACL_SIZE: usize = 1024;
// ACL header (handle/flags + length) plus the largest payload
pub const HCI_MAX_ACL_PACKET: usize = 4 + HCI_MAX_ACL_SIZE;

// Common OGF (Opcode Group Field) values
pub const OGF_LINK_CTL: u8 = 0x01;
pub const OGF_HOST_CTL: u8 = 0x03;
pub const OGF_INFO_PARAM: u8 = 0x04;

// Link Control Commands (OGF: 0x01)
pub const OCF_INQUIRY: u16 = 0x0001;
pub const OCF_INQUIRY_CANCEL: u16 = 0x0002;
pub const OCF_CREATE_CONNECTION: u16 = 0x0005;
pub const OCF_DISCONNECT: u16 = 0x0006;
pub const OCF_ACCEPT_CONNECTION_REQUEST: u16 = 0x0009;
pub const OCF_REJECT_CONNECTION_REQUEST: u16 = 0x000A;
pub const OCF_LINK_KEY_REQUEST_REPLY: u16 = 0x000B;
pub const OCF_LINK_KEY_REQUEST_NEGATIVE_REPLY: u16 = 0x000C;
pub const OCF_AUTHENTICATION_REQUESTED: u16 = 0x0011;
pub const OCF_SET_CONNECTION_ENCRYPTION: u16 = 0x0013;
pub const OCF_REMOTE_NAME_REQUEST: u16 = 0x0019;
pub const OCF_READ_REMOTE_SUPPORTED_FEATURES: u16 = 0x001B;
pub const OCF_READ_REMOTE_EXTENDED_FEATURES: u16 = 0x001C;
pub const OCF_IO_CAPABILITY_REQUEST_REPLY: u16 = 0x002B;
pub const OCF_USER_CONFIRMATION_REQUEST_REPLY: u16 = 0x002C;

// Host Controller Commands (OGF: 0x03)
pub const OCF_SET_EVENT_MASK: u16 = 0x0001;
pub const OCF_RESET: u16 = 0x0003;
pub const OCF_WRITE_LOCAL_NAME: u16 = 0x0013;
pub const OCF_WRITE_SCAN_ENABLE: u16 = 0x001A;
pub const OCF_WRITE_CLASS_OF_DEVICE: u16 = 0x0024;
pub const OCF_WRITE_SIMPLE_PAIRING_MODE: u16 = 0x0056;

// Informational Parameters (OGF: 0x04)
pub const OCF_READ_BD_ADDR: u16 = 0x0009;

// HCI Events
pub const EVT_INQUIRY_COMPLETE: u8 = 0x01;
pub const EVT_INQUIRY_RESULT: u8 = 0x02;
pub const EVT_CONN_COMPLETE: u8 = 0x03;
pub const EVT_CONN_REQUEST: u8 = 0x04;
pub const EVT_DISCONN_COMPLETE: u8 = 0x05;
pub const EVT_AUTH_COMPLETE: u8 = 0x06;
pub const EVT_REMOTE_NAME_REQ_COMPLETE: u8 = 0x07;
pub const EVT_ENCRYPTION_CHANGE: u8 = 0x08;
pub const EVT_CHANGE_CONN_LINK_KEY_COMPLETE: u8 = 0x09;
pub const EVT_READ_REMOTE_FEATURES_COMPLETE: u8 = 0x0B;
pub const EVT_READ_REMOTE_VERSION_COMPLETE: u8 = 0x0C;
pub const EVT_QOS_SETUP_COMPLETE: u8 = 0x0D;
pub const EVT_CMD_COMPLETE: u8 = 0x0E;
pub const EVT_CMD_STATUS: u8 = 0x0F;
pub const EVT_HARDWARE_ERROR: u8 = 0x10;
pub const EVT_ROLE_CHANGE: u8 = 0x12;
pub const EVT_NUM_COMP_PKTS: u8 = 0x13;
pub const EVT_MODE_CHANGE: u8 = 0x14;
pub const EVT_RETURN_LINK_KEYS: u8 = 0x15;
pub const EVT_PIN_CODE_REQ: u8 = 0x16;
pub const EVT_LINK_KEY_REQ: u8 = 0x17;
pub const EVT_LINK_KEY_NOTIFY: u8 = 0x18;
pub const EVT_LOOPBACK_COMMAND: u8 = 0x19;
pub const EVT_DATA_BUFFER_OVERFLOW: u8 = 0x1A;
pub const EVT_MAX_SLOTS_CHANGE: u8 = 0x1B;
pub const EVT_PSCAN_REP_MODE_CHANGE: u8 = 0x20;
pub const EVT_INQUIRY_RESULT_WITH_RSSI: u8 = 0x22;
pub const EVT_READ_REMOTE_EXT_FEATURES_COMPLETE: u8 = 0x23;
pub const EVT_EXTENDED_INQUIRY_RESULT: u8 = 0x2F;
pub const EVT_IO_CAPABILITY_REQUEST: u8 = 0x31;
pub const EVT_IO_CAPABILITY_RESPONSE: u8 = 0x32;
pub const EVT_USER_CONFIRM_REQUEST: u8 = 0x33;
pub const EVT_SIMPLE_PAIRING_COMPLETE: u8 = 0x36;

// Status and reason codes
pub const HCI_SUCCESS: u8 = 0x00;
pub const HCI_REJECTED_UNACCEPTABLE_BDADDR: u8 = 0x0F;
pub const HCI_OE_USER_ENDED_CONNECTION: u8 = 0x13;

// Connection parameters
pub const ACL_PACKET_TYPES: u16 = 0xCC18; // DM1, DH1, DM3, DH3, DM5, DH5
pub const PAGE_SCAN_REPETITION_R1: u8 = 0x01;
pub const ROLE_BECOME_MASTER: u8 = 0x00;
pub const CONN_HANDLE_MASK: u16 = 0x0FFF;

// Secure Simple Pairing
pub const IO_CAP_NO_INPUT_NO_OUTPUT: u8 = 0x03;
pub const OOB_DATA_NOT_PRESENT: u8 = 0x00;
pub const AUTH_REQ_MITM_NOT_REQUIRED: u8 = 0x00;

// Event mask with every BR/EDR event of interest enabled
pub const DEFAULT_EVENT_MASK: u64 = 0x00FF_1FFF_FFFF_FFFF;

// LMP feature bits inspected after Read Remote Supported Features
pub const LMP_FEATURE_ENCRYPTION: (usize, u8) = (0, 0x04);
pub const LMP_FEATURE_EXTENDED: (usize, u8) = (7, 0x80);

pub const LOCAL_NAME_SIZE: usize = 248;
