//! Wire vocabulary: subsystems (header), actions (command) and reply codes.
//!
//! Every enum keeps an explicit `Unknown` variant carrying the raw value,
//! so decoding is total and a bad frame can never panic the router.

// ---------------------------------------------------------------------------
// Raw wire constants
// ---------------------------------------------------------------------------

pub const HEADER_FILL: u32 = 0x0000_0001;
pub const HEADER_DUMP: u32 = 0x0000_0002;
pub const HEADER_PURGE: u32 = 0x0000_0003;
pub const HEADER_IGNITION: u32 = 0x0000_0004;

pub const COMMAND_OPEN: u32 = 0x0000_0001;
pub const COMMAND_CLOSE: u32 = 0x0000_0002;
pub const COMMAND_STATUS: u32 = 0x0000_0003;

pub const RESULT_CLOSED: u32 = 0x0000_0000;
pub const RESULT_OPEN: u32 = 0x0000_0001;
pub const RESULT_FAILURE: u32 = 0x0000_0010;
pub const RESULT_SUCCESS: u32 = 0x0000_0011;
pub const RESULT_ERROR: u32 = 0x9999_9999;

// ---------------------------------------------------------------------------
// Subsystem (header)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Fill,
    Dump,
    /// Shares the dump valve; no fill interlock.
    Purge,
    Ignition,
    Unknown(u32),
}

impl Subsystem {
    pub fn from_wire(header: u32) -> Self {
        match header {
            HEADER_FILL => Self::Fill,
            HEADER_DUMP => Self::Dump,
            HEADER_PURGE => Self::Purge,
            HEADER_IGNITION => Self::Ignition,
            other => Self::Unknown(other),
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            Self::Fill => HEADER_FILL,
            Self::Dump => HEADER_DUMP,
            Self::Purge => HEADER_PURGE,
            Self::Ignition => HEADER_IGNITION,
            Self::Unknown(raw) => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Action (command)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Open,
    Close,
    Status,
    Unknown(u32),
}

impl Action {
    pub fn from_wire(command: u32) -> Self {
        match command {
            COMMAND_OPEN => Self::Open,
            COMMAND_CLOSE => Self::Close,
            COMMAND_STATUS => Self::Status,
            other => Self::Unknown(other),
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            Self::Open => COMMAND_OPEN,
            Self::Close => COMMAND_CLOSE,
            Self::Status => COMMAND_STATUS,
            Self::Unknown(raw) => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Reply code (result)
// ---------------------------------------------------------------------------

/// The single result vocabulary carried in every reply frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ReplyCode {
    Closed = RESULT_CLOSED,
    Open = RESULT_OPEN,
    Failure = RESULT_FAILURE,
    Success = RESULT_SUCCESS,
    Error = RESULT_ERROR,
}

impl ReplyCode {
    pub const fn to_wire(self) -> u32 {
        self as u32
    }

    /// Parse a reply value.  Anything outside the vocabulary reads as `Error`.
    pub fn from_wire(value: u32) -> Self {
        match value {
            RESULT_CLOSED => Self::Closed,
            RESULT_OPEN => Self::Open,
            RESULT_FAILURE => Self::Failure,
            RESULT_SUCCESS => Self::Success,
            _ => Self::Error,
        }
    }
}
