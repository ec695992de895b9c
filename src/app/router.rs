//! Command router: maps a decoded request onto the valve bank.
//!
//! ```text
//!  header ──▶ Subsystem ─┐
//!                        ├──▶ ValveBank op / status ──▶ ReplyCode
//!  command ──▶ Action ───┘
//! ```
//!
//! Every request produces exactly one reply, error cases included.
//! Failure is only ever signalled through [`ReplyCode::Error`]; routing
//! never closes the connection.

use crate::error::ProtocolError;
use crate::protocol::codec::{self, Frame};
use crate::protocol::vocab::{Action, ReplyCode, Subsystem};

use super::ports::GpioPort;
use super::valves::ValveBank;

/// A decoded request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub header: u32,
    pub command: u32,
}

impl Request {
    pub fn from_frame(frame: &Frame) -> Self {
        let (header, command) = codec::decode(frame);
        Self { header, command }
    }

    pub fn subsystem(&self) -> Subsystem {
        Subsystem::from_wire(self.header)
    }

    pub fn action(&self) -> Action {
        Action::from_wire(self.command)
    }
}

/// A reply frame: the request header echoed with a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub header: u32,
    pub result: ReplyCode,
}

impl Reply {
    pub fn to_frame(self) -> Frame {
        codec::encode(self.header, self.result.to_wire())
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed {
    pub result: ReplyCode,
    /// Whether a reply frame goes back to the peer.
    pub send_reply: bool,
    /// Why the result is `Error`, when it is.
    pub error: Option<ProtocolError>,
}

impl Routed {
    fn ok(result: ReplyCode) -> Self {
        Self {
            result,
            send_reply: true,
            error: None,
        }
    }

    fn rejected(error: ProtocolError) -> Self {
        Self {
            result: ReplyCode::Error,
            send_reply: true,
            error: Some(error),
        }
    }
}

/// Route one `(header, command)` pair.
pub fn route<G: GpioPort>(bank: &mut ValveBank<G>, header: u32, command: u32) -> Routed {
    let result = match (Subsystem::from_wire(header), Action::from_wire(command)) {
        (Subsystem::Unknown(raw), _) => return Routed::rejected(ProtocolError::UnknownSubsystem(raw)),
        (_, Action::Unknown(raw)) => return Routed::rejected(ProtocolError::UnknownAction(raw)),

        (Subsystem::Fill, Action::Open) => bank.fill_open(),
        (Subsystem::Fill, Action::Close) => bank.fill_close(),
        (Subsystem::Fill, Action::Status) => bank.fill_status(),

        (Subsystem::Dump, Action::Open) => bank.dump_open(),
        (Subsystem::Dump, Action::Close) => bank.dump_close(),
        (Subsystem::Dump, Action::Status) => bank.dump_status(),

        (Subsystem::Purge, Action::Open) => bank.purge_open(),
        (Subsystem::Purge, Action::Close) => bank.purge_close(),
        (Subsystem::Purge, Action::Status) => bank.dump_status(),

        (Subsystem::Ignition, Action::Open) => bank.ignition_open(),
        (Subsystem::Ignition, Action::Close) => bank.ignition_close(),
        (Subsystem::Ignition, Action::Status) => bank.ignition_status(),
    };
    Routed::ok(result)
}

/// Decode, route and encode one frame.
pub fn handle_frame<G: GpioPort>(bank: &mut ValveBank<G>, frame: &Frame) -> (Frame, Routed) {
    let req = Request::from_frame(frame);
    let routed = route(bank, req.header, req.command);
    let reply = Reply {
        header: req.header,
        result: routed.result,
    };
    (reply.to_frame(), routed)
}
