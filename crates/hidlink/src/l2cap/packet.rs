//! L2CAP Packet handling
//!
//! ACL data header, L2CAP basic header and signaling command header,
//! plus the framer that wraps an L2CAP payload for the controller.

use super::constants::*;
use super::types::*;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// ACL data packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclHeader {
    /// 12-bit connection handle
    pub handle: u16,
    /// Packet boundary flag
    pub packet_boundary: u8,
    /// Broadcast flag
    pub broadcast: u8,
    /// Length of the ACL payload (L2CAP header + payload)
    pub length: u16,
}

impl AclHeader {
    pub fn new(handle: u16, length: u16) -> Self {
        Self {
            handle: handle & 0x0FFF,
            packet_boundary: ACL_PB_FIRST_FLUSHABLE,
            broadcast: ACL_BC_POINT_TO_POINT,
            length,
        }
    }

    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < ACL_HEADER_SIZE {
            return None;
        }

        let raw = LittleEndian::read_u16(&data[0..2]);
        Some(Self {
            handle: raw & 0x0FFF,
            packet_boundary: ((raw >> 12) & 0x03) as u8,
            broadcast: ((raw >> 14) & 0x03) as u8,
            length: LittleEndian::read_u16(&data[2..4]),
        })
    }

    pub fn to_bytes(&self) -> [u8; ACL_HEADER_SIZE] {
        let raw = (self.handle & 0x0FFF)
            | ((self.packet_boundary as u16 & 0x03) << 12)
            | ((self.broadcast as u16 & 0x03) << 14);

        let mut result = [0u8; ACL_HEADER_SIZE];
        LittleEndian::write_u16(&mut result[0..2], raw);
        LittleEndian::write_u16(&mut result[2..4], self.length);
        result
    }

    /// True when `data` is a first-fragment ACL packet on `handle`
    pub fn matches_handle(data: &[u8], handle: u16) -> bool {
        data.len() >= 2
            && data[0] == (handle & 0xFF) as u8
            && data[1] == (((handle >> 8) & 0x0F) as u8 | (ACL_PB_FIRST_FLUSHABLE << 4))
    }
}

/// L2CAP Packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2capHeader {
    /// Length of the L2CAP payload in bytes
    pub length: u16,
    /// Channel Identifier
    pub channel_id: u16,
}

impl L2capHeader {
    /// Create a new L2CAP header
    pub fn new(length: u16, channel_id: u16) -> Self {
        Self { length, channel_id }
    }

    /// Parse an L2CAP header from raw bytes
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < L2CAP_BASIC_HEADER_SIZE {
            return None;
        }

        let mut cursor = Cursor::new(data);
        let length = cursor.read_u16::<LittleEndian>().ok()?;
        let channel_id = cursor.read_u16::<LittleEndian>().ok()?;

        Some(Self { length, channel_id })
    }

    /// Serialize the header to bytes
    pub fn to_bytes(&self) -> [u8; L2CAP_BASIC_HEADER_SIZE] {
        let mut result = [0u8; L2CAP_BASIC_HEADER_SIZE];
        LittleEndian::write_u16(&mut result[0..2], self.length);
        LittleEndian::write_u16(&mut result[2..4], self.channel_id);
        result
    }
}

/// L2CAP signaling command header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2capCommandHeader {
    /// Command code
    pub code: u8,
    /// Command identifier
    pub identifier: SignalId,
    /// Length of command parameters
    pub length: u16,
}

impl L2capCommandHeader {
    /// Create a new command header
    pub fn new(code: u8, identifier: SignalId, length: u16) -> Self {
        Self {
            code,
            identifier,
            length,
        }
    }

    /// Parse a command header from raw bytes
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < L2CAP_COMMAND_HEADER_SIZE {
            return None;
        }

        let code = data[0];
        let identifier = data[1];

        let mut cursor = Cursor::new(&data[2..4]);
        let length = cursor.read_u16::<LittleEndian>().ok()?;

        Some(Self {
            code,
            identifier,
            length,
        })
    }

    /// Serialize the command header to bytes
    pub fn to_bytes(&self) -> [u8; L2CAP_COMMAND_HEADER_SIZE] {
        let mut result = [0u8; L2CAP_COMMAND_HEADER_SIZE];

        result[0] = self.code;
        result[1] = self.identifier;
        LittleEndian::write_u16(&mut result[2..4], self.length);

        result
    }
}

/// Wrap an L2CAP payload for `channel_id` in ACL and L2CAP headers
pub fn acl_frame(handle: u16, channel_id: u16, payload: &[u8]) -> Vec<u8> {
    let l2cap = L2capHeader::new(payload.len() as u16, channel_id);
    let acl = AclHeader::new(handle, (L2CAP_BASIC_HEADER_SIZE + payload.len()) as u16);

    let mut frame = Vec::with_capacity(ACL_HEADER_SIZE + L2CAP_BASIC_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&acl.to_bytes());
    frame.extend_from_slice(&l2cap.to_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Split an inbound ACL packet into its headers and L2CAP payload
pub fn parse_acl(data: &[u8]) -> L2capResult<(AclHeader, L2capHeader, &[u8])> {
    let acl = AclHeader::parse(data)
        .ok_or_else(|| L2capError::InvalidParameter("ACL packet too short".into()))?;
    let rest = &data[ACL_HEADER_SIZE..];
    let l2cap = L2capHeader::parse(rest)
        .ok_or_else(|| L2capError::InvalidParameter("L2CAP header too short".into()))?;

    let payload = &rest[L2CAP_BASIC_HEADER_SIZE..];
    let len = (l2cap.length as usize).min(payload.len());
    Ok((acl, l2cap, &payload[..len]))
}
