use crate::gap::BdAddr;
use std::fmt;

/// Controller bring-up phases, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitState {
    Reset,
    ReadLocalAddress,
    WriteClassOfDevice,
    WriteLocalName,
    WriteSimplePairingMode,
    SetEventMask,
    Complete,
    Error,
}

/// Successor of each state after its command completes successfully.
/// `Error` restarts the sequence.
const TRANSITIONS: [(InitState, InitState); 8] = [
    (InitState::Reset, InitState::ReadLocalAddress),
    (InitState::ReadLocalAddress, InitState::WriteClassOfDevice),
    (InitState::WriteClassOfDevice, InitState::WriteLocalName),
    (InitState::WriteLocalName, InitState::WriteSimplePairingMode),
    (InitState::WriteSimplePairingMode, InitState::SetEventMask),
    (InitState::SetEventMask, InitState::Complete),
    (InitState::Complete, InitState::Complete),
    (InitState::Error, InitState::Reset),
];

impl InitState {
    pub fn next(self) -> InitState {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(InitState::Reset)
    }
}

/// Coarse status exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BtStatus {
    Error,
    #[default]
    None,
    Init,
    ConnectWait,
    PairingWait,
    ConnectInProgress,
    PairingInProgress,
    Connected,
}

impl fmt::Display for BtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BtStatus::Error => "error",
            BtStatus::None => "none",
            BtStatus::Init => "initializing",
            BtStatus::ConnectWait => "waiting for connection",
            BtStatus::PairingWait => "waiting to pair",
            BtStatus::ConnectInProgress => "connecting",
            BtStatus::PairingInProgress => "pairing",
            BtStatus::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Booleans and addresses describing the current link.
///
/// `pair_with_hid_device` is true exactly when no link key is stored;
/// it is recomputed whenever scan/inquiry mode is selected.
#[derive(Debug, Clone, Default)]
pub struct LinkState {
    pub pair_with_hid_device: bool,
    pub connect_address_is_set: bool,
    pub connected_to_hid: bool,
    pub incoming_hid_device: bool,
    pub encryption_eligible: bool,
    pub waiting_for_connection: bool,
    pub start_scan_inquiry: bool,
    pub link_key_notified: bool,
    /// Current ACL connection handle, zero when none
    pub hci_handle: u16,
    /// Address of the connected peer
    pub connected_addr: BdAddr,
    /// Last peer seen in an inquiry result or connection request
    pub peer_addr: BdAddr,
    pub remote_name: String,
    pub inquiry_rounds: u8,
}

impl LinkState {
    /// Forget everything about the current or pending connection.
    pub fn clear(&mut self) {
        *self = LinkState::default();
    }
}
