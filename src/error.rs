//! Error types for the GSE controller.
//!
//! `Error` covers failures surfaced to the caller: a rejected configuration
//! or an unconfirmed ignition command.  `ProtocolError` and `TransportError`
//! never leave the supervisor: protocol errors become an `Error` reply code,
//! transport errors become a link loss, and the loop keeps running.  All
//! types are `Copy` so they can be logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The ignition controller link failed.
    Ignition(LinkError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignition(e) => write!(f, "ignition link: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Header does not name a known subsystem.
    UnknownSubsystem(u32),
    /// Command does not name a known action.
    UnknownAction(u32),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSubsystem(h) => write!(f, "unknown subsystem header 0x{h:08x}"),
            Self::UnknownAction(c) => write!(f, "unknown action command 0x{c:08x}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Socket could not be bound to the control port.
    BindFailed,
    /// Socket could not be put into listening mode.
    ListenFailed,
    /// Receive failed or the peer went away mid-read.
    ReceiveFailed,
    /// Send failed.
    SendFailed,
    /// Fewer octets than a full frame were accepted by the socket.
    ShortSend { sent: usize },
    /// Local disconnect did not complete.
    DisconnectFailed,
    /// Operation requires a connected peer but none is present.
    NotConnected,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "bind failed"),
            Self::ListenFailed => write!(f, "listen failed"),
            Self::ReceiveFailed => write!(f, "receive failed"),
            Self::SendFailed => write!(f, "send failed"),
            Self::ShortSend { sent } => write!(f, "short send ({sent} octets)"),
            Self::DisconnectFailed => write!(f, "disconnect failed"),
            Self::NotConnected => write!(f, "no peer connected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ignition link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Serial write failed or was incomplete.
    WriteFailed,
    /// Serial read failed.
    ReadFailed,
    /// No acknowledgement octet arrived within the poll limit.
    AckTimeout,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "serial write failed"),
            Self::ReadFailed => write!(f, "serial read failed"),
            Self::AckTimeout => write!(f, "no acknowledgement from ignition controller"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Ignition(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
