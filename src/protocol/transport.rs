//! Transport abstraction for the single control connection.
//!
//! Concrete implementations:
//! - TCP socket over Ethernet/WiFi ([`TcpTransport`](crate::adapters::tcp_transport::TcpTransport))
//! - scripted in-memory transports in the test suite
//!
//! The supervisor is generic over `Transport`, so swapping the network
//! stack requires zero changes to the routing or safety logic.  Every
//! method is a bounded, non-blocking poll.

use std::net::SocketAddr;

use crate::error::TransportError;

/// Socket state as reported by the network stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    /// No socket, or the socket was torn down.
    Closed,
    /// Bound and waiting for the ground station.
    Listening,
    /// A peer is connected.
    Established,
    /// The peer sent FIN (or the link broke); a local disconnect is due.
    PeerClosing,
}

/// Byte-stream transport bound to one connection.
pub trait Transport {
    /// Observe the socket.  May advance the stack (e.g. accept a pending
    /// peer) but never blocks.
    fn socket_state(&mut self) -> SocketState;

    /// Octets buffered for reading.  `0` when nothing is pending.
    fn bytes_available(&mut self) -> usize;

    /// Read up to `buf.len()` buffered octets.
    /// Returns the number of octets actually read.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Queue `data` for sending.  Returns the number of octets accepted.
    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Tear down the current connection.
    fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Arm the bound socket for an incoming connection.
    fn listen(&mut self) -> Result<(), TransportError>;

    /// Open a socket bound to `port`.
    fn bind(&mut self, port: u16) -> Result<(), TransportError>;

    /// Address of the connected peer, when the stack knows it.
    fn peer_addr(&self) -> Option<SocketAddr> {
        None
    }
}
