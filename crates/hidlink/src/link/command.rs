//! Outstanding-command tracking.
//!
//! Only one command is on the wire at a time. Further commands wait in a
//! FIFO until the Command Complete or Command Status for the outstanding
//! opcode arrives.

use crate::error::HciError;
use crate::hci::HciCommand;
use crate::link::transport::Transport;
use log::{debug, trace, warn};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCommand {
    pub opcode: u16,
    /// Tick time the command was written
    pub issued_at: u32,
}

#[derive(Debug, Default)]
pub struct CommandTracker {
    pending: Option<PendingCommand>,
    queue: VecDeque<HciCommand>,
    retry_count: u8,
}

impl CommandTracker {
    /// Write `command` now if nothing is outstanding, otherwise queue it.
    pub fn issue(&mut self, transport: &mut dyn Transport, command: HciCommand, now: u32) -> Result<(), HciError> {
        if let Some(pending) = self.pending {
            debug!(
                "queueing opcode 0x{:04X} behind 0x{:04X}",
                command.opcode(),
                pending.opcode
            );
            self.queue.push_back(command);
            return Ok(());
        }
        self.write(transport, &command, now)
    }

    fn write(&mut self, transport: &mut dyn Transport, command: &HciCommand, now: u32) -> Result<(), HciError> {
        let bytes = command.to_bytes();
        trace!("command {}", hex::encode(&bytes));
        transport.send_command(&bytes)?;
        self.pending = Some(PendingCommand {
            opcode: command.opcode(),
            issued_at: now,
        });
        Ok(())
    }

    /// Mark the outstanding command answered. Returns false when `opcode`
    /// is not the one outstanding.
    pub fn resolve(&mut self, opcode: u16) -> bool {
        match self.pending {
            Some(pending) if pending.opcode == opcode => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Write queued commands until one is outstanding again.
    pub fn flush(&mut self, transport: &mut dyn Transport, now: u32) {
        while self.pending.is_none() {
            let Some(command) = self.queue.pop_front() else {
                break;
            };
            if let Err(e) = self.write(transport, &command, now) {
                warn!("dropping opcode 0x{:04X}: {}", command.opcode(), e);
            }
        }
    }

    /// Drop the outstanding command once it has gone unanswered for `timeout_ms`.
    pub fn expire(&mut self, now: u32, timeout_ms: u32) -> Option<PendingCommand> {
        let pending = self.pending?;
        if now.wrapping_sub(pending.issued_at) >= timeout_ms {
            self.pending = None;
            Some(pending)
        } else {
            None
        }
    }

    pub fn pending(&self) -> Option<PendingCommand> {
        self.pending
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// Count one more failure of the current init step.
    pub fn record_failure(&mut self) -> u8 {
        self.retry_count = self.retry_count.saturating_add(1);
        self.retry_count
    }

    pub fn reset_retries(&mut self) {
        self.retry_count = 0;
    }

    /// Forget the outstanding command and everything queued behind it.
    pub fn clear(&mut self) {
        self.pending = None;
        self.queue.clear();
    }
}
