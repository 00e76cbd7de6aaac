// Class of Device: major device class lives in the low nibble of the middle byte
pub const COD_MAJOR_CLASS_MASK: u8 = 0x0F;
pub const COD_MAJOR_CLASS_PERIPHERAL: u8 = 0x05;

// Minor class bits for keyboard (0x40), pointing device (0x80) and
// joystick/gamepad (0x04/0x08) in the low byte
pub const COD_MINOR_HID_MASK: u8 = 0xCC;

// Class advertised by this host: major class Toy (0x08), minor Robot (0x04)
pub const LOCAL_CLASS_OF_DEVICE: [u8; 3] = [0x04, 0x08, 0x00];

// General/Unlimited Inquiry Access Code (0x9E8B33), little-endian
pub const GIAC_LAP: [u8; 3] = [0x33, 0x8B, 0x9E];
// 0x30 * 1.28 s = 61.44 s
pub const INQUIRY_LENGTH: u8 = 0x30;
pub const INQUIRY_MAX_RESPONSES: u8 = 0x0A;

// Write Scan Enable values
pub const SCAN_DISABLED: u8 = 0x00;
pub const SCAN_INQUIRY_ONLY: u8 = 0x01;
pub const SCAN_PAGE_ONLY: u8 = 0x02;
pub const SCAN_INQUIRY_AND_PAGE: u8 = 0x03;

pub const LINK_KEY_SIZE: usize = 16;
pub const MAX_REMOTE_NAME_LEN: usize = 29;
