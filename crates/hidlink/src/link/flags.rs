//! Edge-triggered notifications raised by the event interpreter and
//! consumed by the link manager.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HciFlags: u16 {
        const CMD_COMPLETE = 1 << 0;
        const CONNECT_COMPLETE = 1 << 1;
        const DISCONNECT_COMPLETE = 1 << 2;
        const REMOTE_NAME_COMPLETE = 1 << 3;
        const INCOMING_REQUEST = 1 << 4;
        const READ_BDADDR = 1 << 5;
        const HID_DEVICE_FOUND = 1 << 6;
        const CONNECT_EVENT = 1 << 7;
        const LINK_KEY_UPDATED = 1 << 8;
    }
}

/// Named flag register; every flag is independent and cleared explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagRegister(HciFlags);

impl FlagRegister {
    pub fn set(&mut self, flags: HciFlags) {
        self.0.insert(flags);
    }

    pub fn clear(&mut self, flags: HciFlags) {
        self.0.remove(flags);
    }

    pub fn check(&self, flags: HciFlags) -> bool {
        self.0.contains(flags)
    }

    /// Clear `flags`, returning whether they were all set.
    pub fn take(&mut self, flags: HciFlags) -> bool {
        let set = self.check(flags);
        self.clear(flags);
        set
    }

    pub fn reset(&mut self) {
        self.0 = HciFlags::empty();
    }

    pub fn bits(&self) -> HciFlags {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut flags = FlagRegister::default();
        flags.set(HciFlags::CONNECT_COMPLETE | HciFlags::HID_DEVICE_FOUND);

        assert!(flags.check(HciFlags::CONNECT_COMPLETE));
        assert!(flags.check(HciFlags::HID_DEVICE_FOUND));
        assert!(!flags.check(HciFlags::DISCONNECT_COMPLETE));

        flags.clear(HciFlags::CONNECT_COMPLETE);
        assert!(!flags.check(HciFlags::CONNECT_COMPLETE));
        assert!(flags.check(HciFlags::HID_DEVICE_FOUND));

        assert!(flags.take(HciFlags::HID_DEVICE_FOUND));
        assert!(!flags.take(HciFlags::HID_DEVICE_FOUND));
        assert_eq!(flags.bits(), HciFlags::empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut flags = FlagRegister::default();
        flags.set(HciFlags::all());
        flags.reset();
        assert_eq!(flags, FlagRegister::default());
    }
}
