//! L2CAP protocol constants

// Header sizes
pub const ACL_HEADER_SIZE: usize = 4;
pub const L2CAP_BASIC_HEADER_SIZE: usize = 4;
pub const L2CAP_COMMAND_HEADER_SIZE: usize = 4;

// ACL packet boundary / broadcast flags: first automatically-flushable, point-to-point
pub const ACL_PB_FIRST_FLUSHABLE: u8 = 0x02;
pub const ACL_BC_POINT_TO_POINT: u8 = 0x00;

// Fixed channel identifiers
pub const L2CAP_SIGNALING_CID: u16 = 0x0001;

// Signaling command codes
pub const L2CAP_COMMAND_REJECT: u8 = 0x01;
pub const L2CAP_CONNECTION_REQUEST: u8 = 0x02;
pub const L2CAP_CONNECTION_RESPONSE: u8 = 0x03;
pub const L2CAP_CONFIGURE_REQUEST: u8 = 0x04;
pub const L2CAP_CONFIGURE_RESPONSE: u8 = 0x05;
pub const L2CAP_DISCONNECTION_REQUEST: u8 = 0x06;
pub const L2CAP_DISCONNECTION_RESPONSE: u8 = 0x07;
pub const L2CAP_INFORMATION_REQUEST: u8 = 0x0A;
pub const L2CAP_INFORMATION_RESPONSE: u8 = 0x0B;

// Connection response results
pub const L2CAP_CONN_SUCCESS: u8 = 0x00;
pub const L2CAP_CONN_PENDING: u8 = 0x01;

// Configuration option: MTU
pub const L2CAP_CONF_MTU: u8 = 0x01;
pub const L2CAP_CONF_MTU_LEN: u8 = 0x02;
// MTU we advertise in a Configuration Request
pub const L2CAP_REQUEST_MTU: u16 = 0xFFFF;
// Signaling default, also what we accept in a Configuration Response
pub const L2CAP_DEFAULT_MTU: u16 = 0x02A0;

// Information request types
pub const L2CAP_INFO_EXTENDED_FEATURES: u16 = 0x0002;
