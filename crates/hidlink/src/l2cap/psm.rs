//! Protocol/Service Multiplexer (PSM) values used by the HID profile family

use std::fmt;

/// Protocol/Service Multiplexer (PSM) values used in L2CAP.
///
/// See Bluetooth Core Specification Vol 3, Part A, Section 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Psm {
    /// Service Discovery Protocol
    Sdp,
    /// RFCOMM protocol
    Rfcomm,
    /// HID Control
    HidControl,
    /// HID Interrupt
    HidInterrupt,
    /// Any other PSM
    Other(u16),
}

impl Psm {
    /// Get the PSM value as u16
    pub fn value(&self) -> u16 {
        match self {
            Psm::Sdp => 0x0001,
            Psm::Rfcomm => 0x0003,
            Psm::HidControl => 0x0011,
            Psm::HidInterrupt => 0x0013,
            Psm::Other(value) => *value,
        }
    }

    pub fn from_value(value: u16) -> Self {
        match value {
            0x0001 => Psm::Sdp,
            0x0003 => Psm::Rfcomm,
            0x0011 => Psm::HidControl,
            0x0013 => Psm::HidInterrupt,
            other => Psm::Other(other),
        }
    }
}

impl From<u16> for Psm {
    fn from(value: u16) -> Self {
        Psm::from_value(value)
    }
}

impl fmt::Display for Psm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Psm::Sdp => write!(f, "SDP (0x0001)"),
            Psm::Rfcomm => write!(f, "RFCOMM (0x0003)"),
            Psm::HidControl => write!(f, "HID-Control (0x0011)"),
            Psm::HidInterrupt => write!(f, "HID-Interrupt (0x0013)"),
            Psm::Other(value) => write!(f, "PSM (0x{:04X})", value),
        }
    }
}
