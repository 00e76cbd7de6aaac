//! Tests for the L2CAP framing and signaling codec

use super::constants::*;
use super::packet::*;
use super::psm::*;
use super::signaling::*;
use super::types::*;

const HANDLE: u16 = 0x0047;

#[test]
fn test_psm_value_conversion() {
    assert_eq!(Psm::Sdp.value(), 0x0001);
    assert_eq!(Psm::HidControl.value(), 0x0011);
    assert_eq!(Psm::HidInterrupt.value(), 0x0013);

    assert_eq!(Psm::from_value(0x0011), Psm::HidControl);
    assert_eq!(Psm::from(0x0013), Psm::HidInterrupt);
    assert_eq!(Psm::from_value(0x1001), Psm::Other(0x1001));
    assert_eq!(Psm::Other(0x1001).value(), 0x1001);
}

#[test]
fn test_l2cap_header() {
    let header = L2capHeader::new(10, 0x0040);

    assert_eq!(header.length, 10);
    assert_eq!(header.channel_id, 0x0040);

    let bytes = header.to_bytes();
    assert_eq!(bytes, [0x0A, 0x00, 0x40, 0x00]);
    assert_eq!(L2capHeader::parse(&bytes), Some(header));
    assert!(L2capHeader::parse(&bytes[..3]).is_none());
}

#[test]
fn test_command_header() {
    let header = L2capCommandHeader::new(L2CAP_CONNECTION_REQUEST, 0x05, 4);
    let bytes = header.to_bytes();
    assert_eq!(bytes, [0x02, 0x05, 0x04, 0x00]);
    assert_eq!(L2capCommandHeader::parse(&bytes), Some(header));
}

#[test]
fn test_acl_framing() {
    let frame = acl_frame(0x0A47, L2CAP_SIGNALING_CID, &[0xDE, 0xAD]);

    // Handle low byte, then handle high nibble with PB=0b10
    assert_eq!(frame[0], 0x47);
    assert_eq!(frame[1], 0x2A);
    // ACL length covers L2CAP header and payload
    assert_eq!(&frame[2..4], &[0x06, 0x00]);
    // L2CAP length and channel
    assert_eq!(&frame[4..6], &[0x02, 0x00]);
    assert_eq!(&frame[6..8], &[0x01, 0x00]);
    assert_eq!(&frame[8..], &[0xDE, 0xAD]);

    let acl = AclHeader::parse(&frame).unwrap();
    assert_eq!(acl.handle, 0x0A47);
    assert_eq!(acl.packet_boundary, ACL_PB_FIRST_FLUSHABLE);
    assert_eq!(acl.length, 6);

    assert!(AclHeader::matches_handle(&frame, 0x0A47));
    assert!(!AclHeader::matches_handle(&frame, 0x0047));

    let (acl, l2cap, payload) = parse_acl(&frame).unwrap();
    assert_eq!(acl.handle, 0x0A47);
    assert_eq!(l2cap.channel_id, L2CAP_SIGNALING_CID);
    assert_eq!(payload, &[0xDE, 0xAD]);

    assert!(parse_acl(&frame[..6]).is_err());
}

#[test]
fn test_connection_request() {
    let command = SignalingCommand::connection_request(0x01, Psm::HidControl, 0x0040);
    let frame = command.to_acl(HANDLE);

    assert_eq!(
        frame,
        vec![
            0x47, 0x20, 0x0C, 0x00, // ACL
            0x08, 0x00, 0x01, 0x00, // L2CAP on signaling channel
            0x02, 0x01, 0x04, 0x00, // code, identifier, length
            0x11, 0x00, 0x40, 0x00, // PSM, source CID
        ]
    );

    // Decoding the signaling payload gives back the same parameters
    let decoded = SignalingCommand::parse(&frame[8..]).unwrap();
    assert_eq!(decoded, command);
    assert_eq!(decoded.serialize(), frame[8..].to_vec());
}

#[test]
fn test_connection_response() {
    let command = SignalingCommand::connection_response(0x02, 0x0070, 0x0040, L2CAP_CONN_PENDING);
    assert_eq!(
        command.serialize(),
        vec![0x03, 0x02, 0x08, 0x00, 0x70, 0x00, 0x40, 0x00, 0x01, 0x00, 0x00, 0x00]
    );

    let command = SignalingCommand::connection_response(0x02, 0x0070, 0x0040, L2CAP_CONN_SUCCESS);
    let bytes = command.serialize();
    assert_eq!(&bytes[8..], &[0x00, 0x00, 0x00, 0x00]);
    assert_eq!(SignalingCommand::parse(&bytes).unwrap(), command);
}

#[test]
fn test_configure_commands() {
    let request = SignalingCommand::configure_request(0x03, 0x0070);
    assert_eq!(
        request.serialize(),
        vec![0x04, 0x03, 0x08, 0x00, 0x70, 0x00, 0x00, 0x00, 0x01, 0x02, 0xFF, 0xFF]
    );

    let response = SignalingCommand::configure_response(0x04, 0x0070);
    assert_eq!(
        response.serialize(),
        vec![0x05, 0x04, 0x0A, 0x00, 0x70, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0xA0, 0x02]
    );

    assert_eq!(SignalingCommand::parse(&request.serialize()).unwrap(), request);
    assert_eq!(SignalingCommand::parse(&response.serialize()).unwrap(), response);

    // A configuration request without options falls back to the default MTU
    let bare = [0x04, 0x09, 0x04, 0x00, 0x40, 0x00, 0x00, 0x00];
    match SignalingCommand::parse(&bare).unwrap() {
        SignalingCommand::ConfigureRequest { mtu, destination_cid, .. } => {
            assert_eq!(mtu, L2CAP_DEFAULT_MTU);
            assert_eq!(destination_cid, 0x0040);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_disconnection_commands() {
    let request = SignalingCommand::disconnection_request(0x05, 0x0070, 0x0040);
    assert_eq!(
        request.serialize(),
        vec![0x06, 0x05, 0x04, 0x00, 0x70, 0x00, 0x40, 0x00]
    );

    let response = SignalingCommand::disconnection_response(0x06, 0x0040, 0x0070);
    assert_eq!(
        response.serialize(),
        vec![0x07, 0x06, 0x04, 0x00, 0x40, 0x00, 0x70, 0x00]
    );
}

#[test]
fn test_information_response() {
    let response = SignalingCommand::information_response(0x07, L2CAP_INFO_EXTENDED_FEATURES);
    assert_eq!(
        response.serialize(),
        vec![0x0B, 0x07, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );

    // On an explicit channel
    let frame = response.to_acl_on(HANDLE, 0x0040);
    assert_eq!(&frame[6..8], &[0x40, 0x00]);
}

#[test]
fn test_signaling_parse_errors() {
    assert!(matches!(
        SignalingCommand::parse(&[0x02, 0x01]),
        Err(L2capError::InvalidParameter(_))
    ));

    // Length field claims more parameters than present
    assert!(SignalingCommand::parse(&[0x02, 0x01, 0x04, 0x00, 0x11]).is_err());

    assert!(matches!(
        SignalingCommand::parse(&[0x08, 0x01, 0x00, 0x00]),
        Err(L2capError::NotSupported(0x08))
    ));
}
