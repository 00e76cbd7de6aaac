//! HCI Socket implementation for Bluetooth communication
//!
//! This module wraps a Linux `AF_BLUETOOTH` HCI socket and exposes it as a
//! [`Transport`]: commands and ACL data are written with their H4 packet
//! indicator, and inbound packets are demultiplexed onto the event and ACL
//! pipes.

use crate::error::HciError;
use crate::hci::constants::*;
use crate::link::transport::{Pipe, Transport};
use log::{trace, warn};
use std::collections::VecDeque;
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::time::Duration;

// Bluetooth socket constants
const AF_BLUETOOTH: i32 = 31;
const BTPROTO_HCI: i32 = 1;
const SOL_HCI: i32 = 0;
const HCI_FILTER: i32 = 2;

// Packets read from the socket per receive call
const MAX_DRAIN: usize = 16;
// Packets held per pipe; the oldest is dropped beyond this
const MAX_QUEUED: usize = 32;

/// Which HCI socket channel to bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HciChannel {
    /// Shared with the kernel host stack
    Raw,
    /// Exclusive access; the device must be down
    User,
}

impl HciChannel {
    fn value(self) -> u16 {
        match self {
            HciChannel::Raw => 0,
            HciChannel::User => 1,
        }
    }
}

/// Represents an HCI socket
#[derive(Debug)]
pub struct HciSocket {
    fd: RawFd,
    poll_interval_ms: u32,
    events: VecDeque<Vec<u8>>,
    acl: VecDeque<Vec<u8>>,
}

// Define the sockaddr_hci structure
#[repr(C)]
struct SockaddrHci {
    hci_family: libc::sa_family_t,
    hci_dev: u16,
    hci_channel: u16,
}

#[repr(C)]
struct HciFilter {
    type_mask: u32,
    event_mask: [u32; 2],
    opcode: u16,
}

impl HciSocket {
    /// Gets the raw file descriptor for the socket
    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Opens a new HCI socket
    ///
    /// # Arguments
    ///
    /// * `dev_id` - The device ID to open (0 for the first device)
    /// * `channel` - Raw (shared) or user (exclusive) channel
    pub fn open(dev_id: u16, channel: HciChannel) -> Result<Self, HciError> {
        let fd = unsafe { libc::socket(AF_BLUETOOTH, libc::SOCK_RAW, BTPROTO_HCI) };

        if fd < 0 {
            return Err(HciError::SocketError(std::io::Error::last_os_error()));
        }

        if channel == HciChannel::Raw {
            // Raw sockets deliver nothing until a filter is installed
            let filter = HciFilter {
                type_mask: (1 << HCI_EVENT_PKT) | (1 << HCI_ACL_PKT),
                event_mask: [u32::MAX, u32::MAX],
                opcode: 0,
            };
            let result = unsafe {
                libc::setsockopt(
                    fd,
                    SOL_HCI,
                    HCI_FILTER,
                    &filter as *const _ as *const libc::c_void,
                    std::mem::size_of::<HciFilter>() as libc::socklen_t,
                )
            };
            if result < 0 {
                let err = std::io::Error::last_os_error();
                unsafe { libc::close(fd) };
                return Err(HciError::SocketError(err));
            }
        }

        let addr = SockaddrHci {
            hci_family: AF_BLUETOOTH as libc::sa_family_t,
            hci_dev: dev_id,
            hci_channel: channel.value(),
        };

        let result = unsafe {
            libc::bind(
                fd,
                &addr as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrHci>() as libc::socklen_t,
            )
        };

        if result < 0 {
            let err = std::io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(HciError::BindError(err));
        }

        Ok(HciSocket {
            fd,
            poll_interval_ms: crate::link::transport::DEFAULT_POLL_INTERVAL_MS,
            events: VecDeque::new(),
            acl: VecDeque::new(),
        })
    }

    /// True when packets are already queued and a read would not block
    pub fn has_pending(&self) -> bool {
        !self.events.is_empty() || !self.acl.is_empty()
    }

    pub fn with_poll_interval(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Wait up to `timeout` for the socket to become readable
    pub fn wait_readable(&self, timeout: Duration) -> Result<bool, HciError> {
        let mut read_fds: libc::fd_set = unsafe { std::mem::zeroed() };
        unsafe {
            libc::FD_ZERO(&mut read_fds);
            libc::FD_SET(self.fd, &mut read_fds);
        }

        let mut timeout_val = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };

        let result = unsafe {
            libc::select(
                self.fd + 1,
                &mut read_fds,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &mut timeout_val,
            )
        };

        if result < 0 {
            return Err(HciError::ReceiveError(std::io::Error::last_os_error()));
        }

        Ok(result > 0)
    }

    /// Read queued packets off the socket and sort them by packet type,
    /// stopping as soon as `pipe` has something to hand out
    fn drain(&mut self, pipe: Pipe) -> Result<(), HciError> {
        let mut buffer = [0u8; 1 + HCI_MAX_ACL_PACKET];

        for _ in 0..MAX_DRAIN {
            if !self.queue(pipe).is_empty() || !self.wait_readable(Duration::ZERO)? {
                break;
            }

            let bytes_read = unsafe {
                libc::read(
                    self.fd,
                    buffer.as_mut_ptr() as *mut libc::c_void,
                    buffer.len(),
                )
            };

            if bytes_read < 0 {
                return Err(HciError::ReceiveError(std::io::Error::last_os_error()));
            }

            let packet = &buffer[..bytes_read as usize];
            trace!("hci rx {}", hex::encode(packet));

            match packet.split_first() {
                Some((&HCI_EVENT_PKT, rest)) if rest.len() >= 2 => self.enqueue(Pipe::Event, rest),
                Some((&HCI_ACL_PKT, rest)) if rest.len() >= 4 => self.enqueue(Pipe::AclIn, rest),
                _ => trace!("dropping unexpected packet"),
            }
        }

        Ok(())
    }

    fn queue(&mut self, pipe: Pipe) -> &mut VecDeque<Vec<u8>> {
        match pipe {
            Pipe::Event => &mut self.events,
            Pipe::AclIn => &mut self.acl,
        }
    }

    fn enqueue(&mut self, pipe: Pipe, packet: &[u8]) {
        let queue = self.queue(pipe);
        if queue.len() >= MAX_QUEUED {
            queue.pop_front();
            warn!("{:?} backlog full, dropped oldest packet", pipe);
        }
        queue.push_back(packet.to_vec());
    }

    fn write_packet(&self, indicator: u8, payload: &[u8]) -> Result<(), HciError> {
        let mut packet = Vec::with_capacity(1 + payload.len());
        packet.push(indicator);
        packet.extend_from_slice(payload);
        trace!("hci tx {}", hex::encode(&packet));

        match unsafe {
            libc::write(
                self.fd,
                packet.as_ptr() as *const libc::c_void,
                packet.len(),
            )
        } {
            -1 => Err(HciError::SendError(std::io::Error::last_os_error())),
            _ => Ok(()),
        }
    }
}

impl Transport for HciSocket {
    fn receive(&mut self, pipe: Pipe, buf: &mut [u8]) -> Result<usize, HciError> {
        self.drain(pipe)?;

        match self.queue(pipe).pop_front() {
            Some(packet) => {
                let len = packet.len().min(buf.len());
                buf[..len].copy_from_slice(&packet[..len]);
                Ok(len)
            }
            None => Ok(0),
        }
    }

    fn send_command(&mut self, command: &[u8]) -> Result<(), HciError> {
        self.write_packet(HCI_COMMAND_PKT, command)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), HciError> {
        self.write_packet(HCI_ACL_PKT, data)
    }

    fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }
}

impl AsRawFd for HciSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl FromRawFd for HciSocket {
    /// Wrap an already bound HCI socket. The descriptor is closed on drop.
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        HciSocket {
            fd,
            poll_interval_ms: crate::link::transport::DEFAULT_POLL_INTERVAL_MS,
            events: VecDeque::new(),
            acl: VecDeque::new(),
        }
    }
}

impl Drop for HciSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
