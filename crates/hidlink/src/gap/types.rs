use crate::error::Error;
use crate::gap::constants::*;
use std::fmt;
use std::str::FromStr;

/// Bluetooth device address, stored in over-the-air (little-endian) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BdAddr {
    pub bytes: [u8; 6],
}

impl BdAddr {
    pub const ZERO: BdAddr = BdAddr { bytes: [0; 6] };

    pub fn new(bytes: [u8; 6]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() >= 6 {
            let mut bytes = [0u8; 6];
            bytes.copy_from_slice(&slice[0..6]);
            Some(Self { bytes })
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// An all-zero address means "no address stored".
    pub fn is_zero(&self) -> bool {
        self.bytes == [0; 6]
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

impl FromStr for BdAddr {
    type Err = Error;

    /// Parses the human-readable `AA:BB:CC:DD:EE:FF` form (most significant byte first).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.split(':').collect();
        if digits.len() != 12 || s.split(':').count() != 6 {
            return Err(Error::InvalidAddress(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        hex::decode_to_slice(&digits, &mut bytes)
            .map_err(|_| Error::InvalidAddress(s.to_string()))?;
        bytes.reverse();

        Ok(Self { bytes })
    }
}

/// 128-bit BR/EDR link key. All zeros means no bond.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkKey(pub [u8; LINK_KEY_SIZE]);

impl LinkKey {
    pub const ZERO: LinkKey = LinkKey([0; LINK_KEY_SIZE]);

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() >= LINK_KEY_SIZE {
            let mut key = [0u8; LINK_KEY_SIZE];
            key.copy_from_slice(&slice[..LINK_KEY_SIZE]);
            Some(Self(key))
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; LINK_KEY_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8; LINK_KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

// Keys stay out of Debug output; use `to_hex` deliberately.
impl fmt::Debug for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("LinkKey(none)")
        } else {
            f.write_str("LinkKey(..)")
        }
    }
}

impl FromStr for LinkKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut key = [0u8; LINK_KEY_SIZE];
        hex::decode_to_slice(s.trim(), &mut key)?;
        Ok(Self(key))
    }
}

/// Three-byte Class of Device as carried in inquiry results and connection requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassOfDevice(pub [u8; 3]);

impl ClassOfDevice {
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() >= 3 {
            Some(Self([slice[0], slice[1], slice[2]]))
        } else {
            None
        }
    }

    pub fn major_class(&self) -> u8 {
        self.0[1] & COD_MAJOR_CLASS_MASK
    }

    /// Major class Peripheral with a keyboard, pointing device or gamepad minor class.
    pub fn is_hid_peripheral(&self) -> bool {
        self.major_class() == COD_MAJOR_CLASS_PERIPHERAL && (self.0[0] & COD_MINOR_HID_MASK) != 0
    }
}

impl fmt::Display for ClassOfDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}{:02X}{:02X}", self.0[2], self.0[1], self.0[0])
    }
}

/// Page/inquiry scan setting for Write Scan Enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnable {
    Disabled,
    InquiryOnly,
    PageOnly,
    InquiryAndPage,
}

impl From<ScanEnable> for u8 {
    fn from(value: ScanEnable) -> Self {
        match value {
            ScanEnable::Disabled => SCAN_DISABLED,
            ScanEnable::InquiryOnly => SCAN_INQUIRY_ONLY,
            ScanEnable::PageOnly => SCAN_PAGE_ONLY,
            ScanEnable::InquiryAndPage => SCAN_INQUIRY_AND_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bdaddr_display_and_parse() {
        let addr = BdAddr::new([0x55, 0x44, 0x33, 0x22, 0x11, 0x00]);
        assert_eq!(addr.to_string(), "00:11:22:33:44:55");

        let parsed: BdAddr = "00:11:22:33:44:55".parse().unwrap();
        assert_eq!(parsed, addr);
        assert!(!parsed.is_zero());
        assert!(BdAddr::ZERO.is_zero());

        assert!("00:11:22:33:44".parse::<BdAddr>().is_err());
        assert!("00:11:22:33:44:GG".parse::<BdAddr>().is_err());
        assert!("0011:22:33:44:55".parse::<BdAddr>().is_err());
    }

    #[test]
    fn test_link_key_parse() {
        let key: LinkKey = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
        assert_eq!(key.0[0], 0x00);
        assert_eq!(key.0[15], 0x0F);
        assert_eq!(key.to_hex(), "000102030405060708090a0b0c0d0e0f");
        assert!(!key.is_zero());
        assert!(LinkKey::default().is_zero());

        assert!("0001".parse::<LinkKey>().is_err());
        assert_eq!(format!("{:?}", key), "LinkKey(..)");
    }

    #[test]
    fn test_class_of_device_hid_detection() {
        // Gamepad
        assert!(ClassOfDevice([0x08, 0x25, 0x00]).is_hid_peripheral());
        // Keyboard
        assert!(ClassOfDevice([0x40, 0x05, 0x00]).is_hid_peripheral());
        // Mouse
        assert!(ClassOfDevice([0x80, 0x25, 0x00]).is_hid_peripheral());
        // Peripheral with an uncategorized minor class
        assert!(!ClassOfDevice([0x00, 0x05, 0x00]).is_hid_peripheral());
        // Phone
        assert!(!ClassOfDevice([0x0C, 0x02, 0x5A]).is_hid_peripheral());
        // Audio headset, minor bits overlap but major class does not
        assert!(!ClassOfDevice([0x04, 0x04, 0x20]).is_hid_peripheral());

        // Our own class is a Toy/Robot, so another host running this never pairs with us
        let local = ClassOfDevice(LOCAL_CLASS_OF_DEVICE);
        assert_eq!(local.major_class(), 0x08);
        assert!(!local.is_hid_peripheral());
    }

    #[test]
    fn test_scan_enable_values() {
        assert_eq!(u8::from(ScanEnable::PageOnly), 0x02);
        assert_eq!(u8::from(ScanEnable::InquiryAndPage), 0x03);
    }
}
