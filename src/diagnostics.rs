//! Link statistics and debug rendering of received payloads.
//!
//! Counters are kept by the supervisor and logged periodically by the
//! binary as JSON.  They are never persisted: a restart starts from zero,
//! like the valves.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

/// Monotonic counters for the control link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    /// Supervisor polls since boot.
    pub polls: u64,
    /// Ground-station connections accepted.
    pub links_established: u32,
    /// Request frames routed (including ones answered with `Error`).
    pub frames_handled: u64,
    /// Requests with an unknown subsystem or action.
    pub protocol_errors: u32,
    /// Bind/listen/receive/send/disconnect failures.
    pub transport_errors: u32,
    /// Connections that reached `PeerClosing`.
    pub link_losses: u32,
    /// Emergency shutdowns fired.
    pub emergency_shutdowns: u32,
    /// Octets received past the first frame of a poll and discarded.
    pub surplus_octets: u64,
    /// Octets consumed without yielding a full frame.
    pub dropped_octets: u64,
}

/// Render `data` as lowercase hex into a fixed-capacity string.
///
/// Output stops at the last whole octet that fits in `N` characters.
pub fn hex_dump<const N: usize>(data: &[u8]) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for b in data {
        if out.capacity() - out.len() < 2 || write!(out, "{b:02x}").is_err() {
            break;
        }
    }
    out
}
