//! Ignition controller link over the auxiliary serial port.
//!
//! Commands are four identical octets so the controller never has to care
//! about byte order.  It answers with a single acknowledgement octet.

use log::{debug, warn};

use super::ports::SerialPort;
use crate::error::LinkError;
use crate::protocol::vocab::ReplyCode;

/// Acknowledgement octet meaning the command was carried out.
pub const ACK_SUCCESS: u8 = 0x01;

/// Command length on the wire.
pub const COMMAND_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionCommand {
    On,
    Off,
    Status,
}

impl IgnitionCommand {
    pub const fn pattern(self) -> [u8; COMMAND_LEN] {
        match self {
            Self::On => [0xFF; COMMAND_LEN],
            Self::Off => [0x00; COMMAND_LEN],
            Self::Status => [0xF0; COMMAND_LEN],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionAck {
    Success,
    /// Any octet other than [`ACK_SUCCESS`].
    Failure(u8),
}

impl IgnitionAck {
    pub const fn from_octet(b: u8) -> Self {
        if b == ACK_SUCCESS {
            Self::Success
        } else {
            Self::Failure(b)
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub const fn reply(self) -> ReplyCode {
        match self {
            Self::Success => ReplyCode::Success,
            Self::Failure(_) => ReplyCode::Failure,
        }
    }
}

/// Request/acknowledge channel to the ignition controller.
pub struct IgnitionLink<S: SerialPort> {
    port: S,
    ack_poll_limit: u32,
}

impl<S: SerialPort> IgnitionLink<S> {
    pub fn new(port: S, ack_poll_limit: u32) -> Self {
        Self {
            port,
            ack_poll_limit: ack_poll_limit.max(1),
        }
    }

    /// Write `cmd` and wait (bounded) for its acknowledgement.
    pub fn send(&mut self, cmd: IgnitionCommand) -> crate::Result<IgnitionAck> {
        let pattern = cmd.pattern();
        match self.port.write(&pattern) {
            Ok(COMMAND_LEN) => {}
            Ok(n) => {
                warn!("Ignition {:?}: wrote {} of {} octets", cmd, n, COMMAND_LEN);
                return Err(LinkError::WriteFailed.into());
            }
            Err(e) => {
                warn!("Ignition {:?}: write error {:?}", cmd, e);
                return Err(LinkError::WriteFailed.into());
            }
        }

        let mut ack = [0u8; 1];
        for _ in 0..self.ack_poll_limit {
            match self.port.read(&mut ack) {
                Ok(0) => {}
                Ok(_) => {
                    let ack = IgnitionAck::from_octet(ack[0]);
                    debug!("Ignition {:?} -> {:?}", cmd, ack);
                    return Ok(ack);
                }
                Err(e) => {
                    warn!("Ignition {:?}: read error {:?}", cmd, e);
                    return Err(LinkError::ReadFailed.into());
                }
            }
        }
        Err(LinkError::AckTimeout.into())
    }

    /// Command the igniter off.
    pub fn safe(&mut self) -> crate::Result<IgnitionAck> {
        self.send(IgnitionCommand::Off)
    }

    pub fn port(&self) -> &S {
        &self.port
    }
}
