//! L2CAP Signaling channel commands
//!
//! Fixed-layout encoders for the signaling commands a HID host exchanges
//! on the BR/EDR signaling channel, and a decoder for inbound commands.

use super::constants::*;
use super::packet::*;
use super::psm::Psm;
use super::types::*;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// L2CAP signaling command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingCommand {
    /// Command Reject
    CommandReject { identifier: SignalId, reason: u16 },

    /// Connection Request
    ConnectionRequest {
        identifier: SignalId,
        psm: Psm,
        source_cid: u16,
    },

    /// Connection Response; status is always "no further information"
    ConnectionResponse {
        identifier: SignalId,
        destination_cid: u16,
        source_cid: u16,
        result: u8,
    },

    /// Configuration Request carrying a single MTU option
    ConfigureRequest {
        identifier: SignalId,
        destination_cid: u16,
        mtu: u16,
    },

    /// Successful Configuration Response carrying a single MTU option
    ConfigureResponse {
        identifier: SignalId,
        source_cid: u16,
        mtu: u16,
    },

    /// Disconnection Request
    DisconnectionRequest {
        identifier: SignalId,
        destination_cid: u16,
        source_cid: u16,
    },

    /// Disconnection Response
    DisconnectionResponse {
        identifier: SignalId,
        destination_cid: u16,
        source_cid: u16,
    },

    /// Information Request
    InformationRequest { identifier: SignalId, info_type: u16 },

    /// Successful Information Response with four zero data bytes
    InformationResponse { identifier: SignalId, info_type: u16 },
}

fn read_u16(cursor: &mut Cursor<&[u8]>, field: &str) -> L2capResult<u16> {
    cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| L2capError::InvalidParameter(format!("Failed to read {}", field)))
}

impl SignalingCommand {
    pub fn connection_request(identifier: SignalId, psm: Psm, source_cid: u16) -> Self {
        Self::ConnectionRequest {
            identifier,
            psm,
            source_cid,
        }
    }

    /// `result` is [`L2CAP_CONN_PENDING`] or [`L2CAP_CONN_SUCCESS`]
    pub fn connection_response(identifier: SignalId, destination_cid: u16, source_cid: u16, result: u8) -> Self {
        Self::ConnectionResponse {
            identifier,
            destination_cid,
            source_cid,
            result,
        }
    }

    pub fn configure_request(identifier: SignalId, destination_cid: u16) -> Self {
        Self::ConfigureRequest {
            identifier,
            destination_cid,
            mtu: L2CAP_REQUEST_MTU,
        }
    }

    pub fn configure_response(identifier: SignalId, source_cid: u16) -> Self {
        Self::ConfigureResponse {
            identifier,
            source_cid,
            mtu: L2CAP_DEFAULT_MTU,
        }
    }

    pub fn disconnection_request(identifier: SignalId, destination_cid: u16, source_cid: u16) -> Self {
        Self::DisconnectionRequest {
            identifier,
            destination_cid,
            source_cid,
        }
    }

    pub fn disconnection_response(identifier: SignalId, destination_cid: u16, source_cid: u16) -> Self {
        Self::DisconnectionResponse {
            identifier,
            destination_cid,
            source_cid,
        }
    }

    pub fn information_response(identifier: SignalId, info_type: u16) -> Self {
        Self::InformationResponse {
            identifier,
            info_type,
        }
    }

    /// Get the command code for this signaling command
    pub fn command_code(&self) -> u8 {
        match self {
            Self::CommandReject { .. } => L2CAP_COMMAND_REJECT,
            Self::ConnectionRequest { .. } => L2CAP_CONNECTION_REQUEST,
            Self::ConnectionResponse { .. } => L2CAP_CONNECTION_RESPONSE,
            Self::ConfigureRequest { .. } => L2CAP_CONFIGURE_REQUEST,
            Self::ConfigureResponse { .. } => L2CAP_CONFIGURE_RESPONSE,
            Self::DisconnectionRequest { .. } => L2CAP_DISCONNECTION_REQUEST,
            Self::DisconnectionResponse { .. } => L2CAP_DISCONNECTION_RESPONSE,
            Self::InformationRequest { .. } => L2CAP_INFORMATION_REQUEST,
            Self::InformationResponse { .. } => L2CAP_INFORMATION_RESPONSE,
        }
    }

    /// Get the identifier for this signaling command
    pub fn identifier(&self) -> SignalId {
        match self {
            Self::CommandReject { identifier, .. }
            | Self::ConnectionRequest { identifier, .. }
            | Self::ConnectionResponse { identifier, .. }
            | Self::ConfigureRequest { identifier, .. }
            | Self::ConfigureResponse { identifier, .. }
            | Self::DisconnectionRequest { identifier, .. }
            | Self::DisconnectionResponse { identifier, .. }
            | Self::InformationRequest { identifier, .. }
            | Self::InformationResponse { identifier, .. } => *identifier,
        }
    }

    fn parameters(&self) -> Vec<u8> {
        match self {
            Self::CommandReject { reason, .. } => reason.to_le_bytes().to_vec(),

            Self::ConnectionRequest { psm, source_cid, .. } => {
                let mut params = Vec::with_capacity(4);
                params.extend_from_slice(&psm.value().to_le_bytes());
                params.extend_from_slice(&source_cid.to_le_bytes());
                params
            }

            Self::ConnectionResponse {
                destination_cid,
                source_cid,
                result,
                ..
            } => {
                let mut params = Vec::with_capacity(8);
                params.extend_from_slice(&destination_cid.to_le_bytes());
                params.extend_from_slice(&source_cid.to_le_bytes());
                params.extend_from_slice(&[*result, 0x00]);
                params.extend_from_slice(&[0x00, 0x00]); // status
                params
            }

            Self::ConfigureRequest {
                destination_cid, mtu, ..
            } => {
                let mut params = Vec::with_capacity(8);
                params.extend_from_slice(&destination_cid.to_le_bytes());
                params.extend_from_slice(&[0x00, 0x00]); // flags
                params.extend_from_slice(&[L2CAP_CONF_MTU, L2CAP_CONF_MTU_LEN]);
                params.extend_from_slice(&mtu.to_le_bytes());
                params
            }

            Self::ConfigureResponse { source_cid, mtu, .. } => {
                let mut params = Vec::with_capacity(10);
                params.extend_from_slice(&source_cid.to_le_bytes());
                params.extend_from_slice(&[0x00, 0x00]); // flags
                params.extend_from_slice(&[0x00, 0x00]); // result: success
                params.extend_from_slice(&[L2CAP_CONF_MTU, L2CAP_CONF_MTU_LEN]);
                params.extend_from_slice(&mtu.to_le_bytes());
                params
            }

            Self::DisconnectionRequest {
                destination_cid,
                source_cid,
                ..
            }
            | Self::DisconnectionResponse {
                destination_cid,
                source_cid,
                ..
            } => {
                let mut params = Vec::with_capacity(4);
                params.extend_from_slice(&destination_cid.to_le_bytes());
                params.extend_from_slice(&source_cid.to_le_bytes());
                params
            }

            Self::InformationRequest { info_type, .. } => info_type.to_le_bytes().to_vec(),

            Self::InformationResponse { info_type, .. } => {
                let mut params = Vec::with_capacity(8);
                params.extend_from_slice(&info_type.to_le_bytes());
                params.extend_from_slice(&[0x00, 0x00]); // result: success
                params.extend_from_slice(&[0x00; 4]);
                params
            }
        }
    }

    /// Serialize to a signaling command (header and parameters)
    pub fn serialize(&self) -> Vec<u8> {
        let params = self.parameters();
        let header = L2capCommandHeader::new(self.command_code(), self.identifier(), params.len() as u16);

        let mut result = Vec::with_capacity(L2CAP_COMMAND_HEADER_SIZE + params.len());
        result.extend_from_slice(&header.to_bytes());
        result.extend_from_slice(&params);
        result
    }

    /// Frame as an ACL packet on the signaling channel
    pub fn to_acl(&self, handle: u16) -> Vec<u8> {
        self.to_acl_on(handle, L2CAP_SIGNALING_CID)
    }

    /// Frame as an ACL packet on an explicit channel
    pub fn to_acl_on(&self, handle: u16, channel_id: u16) -> Vec<u8> {
        acl_frame(handle, channel_id, &self.serialize())
    }

    /// Parse a signaling command (header and parameters)
    pub fn parse(data: &[u8]) -> L2capResult<Self> {
        let cmd_header = L2capCommandHeader::parse(data)
            .ok_or_else(|| L2capError::InvalidParameter("Signaling data too short".into()))?;

        let params = &data[L2CAP_COMMAND_HEADER_SIZE..];
        if params.len() < cmd_header.length as usize {
            return Err(L2capError::InvalidParameter("Command parameters too short".into()));
        }
        let params = &params[..cmd_header.length as usize];
        let identifier = cmd_header.identifier;
        let mut cursor = Cursor::new(params);

        match cmd_header.code {
            L2CAP_COMMAND_REJECT => Ok(Self::CommandReject {
                identifier,
                reason: read_u16(&mut cursor, "reason")?,
            }),

            L2CAP_CONNECTION_REQUEST => Ok(Self::ConnectionRequest {
                identifier,
                psm: Psm::from_value(read_u16(&mut cursor, "PSM")?),
                source_cid: read_u16(&mut cursor, "source CID")?,
            }),

            L2CAP_CONNECTION_RESPONSE => {
                let destination_cid = read_u16(&mut cursor, "destination CID")?;
                let source_cid = read_u16(&mut cursor, "source CID")?;
                let result = read_u16(&mut cursor, "result")?;
                Ok(Self::ConnectionResponse {
                    identifier,
                    destination_cid,
                    source_cid,
                    result: result as u8,
                })
            }

            L2CAP_CONFIGURE_REQUEST => {
                let destination_cid = read_u16(&mut cursor, "destination CID")?;
                let _flags = read_u16(&mut cursor, "flags")?;
                Ok(Self::ConfigureRequest {
                    identifier,
                    destination_cid,
                    mtu: Self::mtu_option(&params[4..]),
                })
            }

            L2CAP_CONFIGURE_RESPONSE => {
                let source_cid = read_u16(&mut cursor, "source CID")?;
                let _flags = read_u16(&mut cursor, "flags")?;
                let _result = read_u16(&mut cursor, "result")?;
                Ok(Self::ConfigureResponse {
                    identifier,
                    source_cid,
                    mtu: Self::mtu_option(&params[6..]),
                })
            }

            L2CAP_DISCONNECTION_REQUEST => Ok(Self::DisconnectionRequest {
                identifier,
                destination_cid: read_u16(&mut cursor, "destination CID")?,
                source_cid: read_u16(&mut cursor, "source CID")?,
            }),

            L2CAP_DISCONNECTION_RESPONSE => Ok(Self::DisconnectionResponse {
                identifier,
                destination_cid: read_u16(&mut cursor, "destination CID")?,
                source_cid: read_u16(&mut cursor, "source CID")?,
            }),

            L2CAP_INFORMATION_REQUEST => Ok(Self::InformationRequest {
                identifier,
                info_type: read_u16(&mut cursor, "info type")?,
            }),

            L2CAP_INFORMATION_RESPONSE => Ok(Self::InformationResponse {
                identifier,
                info_type: read_u16(&mut cursor, "info type")?,
            }),

            other => Err(L2capError::NotSupported(other)),
        }
    }

    /// MTU from the option list, or the default signaling MTU when absent
    fn mtu_option(mut options: &[u8]) -> u16 {
        while options.len() >= 2 {
            let option_type = options[0] & 0x7F; // Mask out hint bit
            let option_length = options[1] as usize;
            if options.len() < 2 + option_length {
                break;
            }
            if option_type == L2CAP_CONF_MTU && option_length == 2 {
                return u16::from_le_bytes([options[2], options[3]]);
            }
            options = &options[2 + option_length..];
        }
        L2CAP_DEFAULT_MTU
    }
}
