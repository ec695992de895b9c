//! Outbound application events.
//!
//! The supervisor emits these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them.

use std::net::SocketAddr;

use crate::error::{ProtocolError, TransportError};
use crate::link::ConnectionPhase;
use crate::protocol::vocab::ReplyCode;

use super::valves::ValveSnapshot;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The supervisor has taken ownership of the valves (all closed).
    Started { port: u16 },

    /// The connection phase changed.
    PhaseChanged {
        from: ConnectionPhase,
        to: ConnectionPhase,
    },

    /// The ground station connected.
    LinkUp { peer: Option<SocketAddr> },

    /// A request frame was routed and answered.
    FrameHandled {
        header: u32,
        command: u32,
        result: ReplyCode,
    },

    /// A request named an unknown subsystem or action.
    ProtocolError(ProtocolError),

    /// The transport failed; handled as a link loss.
    TransportError(TransportError),

    /// The control link was lost and every valve was forced closed.
    EmergencyShutdown { valves: ValveSnapshot },
}
