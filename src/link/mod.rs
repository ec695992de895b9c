//! Connection supervisor: the control link's lifecycle.
//!
//! ```text
//!            bind + listen ok           peer accepted
//!  ┌────────┐ ─────────────▶ ┌───────────┐ ──────────▶ ┌─────────────┐
//!  │ Closed │                │ Listening │             │ Established │
//!  └────────┘ ◀───────────── └───────────┘             └─────────────┘
//!      ▲       listener lost                                  │
//!      │                                                      │ FIN, reset,
//!      │  disconnect ok ┌─────────────┐                       │ transport error
//!      └─────────────── │ PeerClosing │ ◀─────────────────────┘
//!     emergency shutdown└─────────────┘
//! ```
//!
//! Every path out of `Established` goes through `PeerClosing`, and the
//! `PeerClosing -> Closed` edge is the only place the emergency shutdown
//! fires.  One lost link, one shutdown.

pub mod supervisor;

pub use supervisor::Supervisor;

/// Lifecycle phase of the single control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionPhase {
    /// No socket open.  The next poll binds and listens.
    #[default]
    Closed,
    /// Waiting for the ground station.
    Listening,
    /// Ground station connected; frames are serviced.
    Established,
    /// Link lost; a local disconnect is pending.
    PeerClosing,
}

impl ConnectionPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Listening => "LISTENING",
            Self::Established => "ESTABLISHED",
            Self::PeerClosing => "PEER_CLOSING",
        }
    }
}

impl core::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
