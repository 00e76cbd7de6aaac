use crate::gap::{BdAddr, LinkKey};
use std::time::Duration;

pub const DEFAULT_COMMAND_RETRY_MAX: u8 = 10;
pub const DEFAULT_INQUIRY_ROUNDS_MAX: u8 = 5;
pub const DEFAULT_COMMAND_TIMEOUT_MS: u32 = 5000;
pub const DEFAULT_SEND_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Link manager settings.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Name written to the controller; also makes the host discoverable
    pub local_name: Option<String>,
    /// Device to page or accept; zero when none is stored
    pub target: BdAddr,
    /// Bond with `target`; zero when unpaired
    pub link_key: LinkKey,
    /// Failures tolerated per init step before restarting from Reset
    pub command_retry_max: u8,
    /// Inquiry rounds per pairing attempt
    pub inquiry_rounds_max: u8,
    /// How long a command may go unanswered
    pub command_timeout_ms: u32,
    /// Back-off after a failed ACL write
    pub send_retry_delay: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            local_name: None,
            target: BdAddr::ZERO,
            link_key: LinkKey::ZERO,
            command_retry_max: DEFAULT_COMMAND_RETRY_MAX,
            inquiry_rounds_max: DEFAULT_INQUIRY_ROUNDS_MAX,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            send_retry_delay: DEFAULT_SEND_RETRY_DELAY,
        }
    }
}

impl LinkConfig {
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    pub fn with_bond(mut self, target: BdAddr, link_key: LinkKey) -> Self {
        self.target = target;
        self.link_key = link_key;
        self
    }
}
