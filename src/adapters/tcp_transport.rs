//! TCP transport adapter.
//!
//! Implements [`Transport`] as a single-client, non-blocking TCP server on
//! top of `std::net`.  The same code runs on ESP-IDF (lwIP behind the std
//! socket layer) and on host, where the integration tests drive it over
//! loopback.
//!
//! ## Connection model
//!
//! 1. `bind(port)` opens a non-blocking listener on `0.0.0.0:<port>`.
//! 2. `listen()` arms it; `socket_state()` then polls `accept()`.
//! 3. On accept the listener is dropped, so a second ground station is
//!    refused until the current connection has been torn down.
//! 4. Availability is measured with `peek()`; a zero-length peek is the
//!    peer's FIN and is reported as `PeerClosing`.
//! 5. `disconnect()` shuts the stream down and returns to `Closed`.

use std::io::{ErrorKind, Read, Write};
use std::net::{IpAddr, Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream};

use log::{debug, info, warn};

use crate::error::TransportError;
use crate::protocol::codec::FRAME_LEN;
use crate::protocol::transport::{SocketState, Transport};

/// Single-client TCP server.
pub struct TcpTransport {
    bind_ip: IpAddr,
    listener: Option<TcpListener>,
    armed: bool,
    stream: Option<TcpStream>,
    peer: Option<SocketAddr>,
    peer_closed: bool,
    /// Scratch buffer for `peek()`; its length caps `bytes_available()`.
    peek_buf: Vec<u8>,
}

impl TcpTransport {
    /// Transport listening on all interfaces.  `window` bounds how many
    /// buffered octets one `bytes_available()` call can see; size it like
    /// the supervisor's receive buffer.
    pub fn new(window: usize) -> Self {
        Self::with_bind_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED), window)
    }

    pub fn with_bind_ip(bind_ip: IpAddr, window: usize) -> Self {
        Self {
            bind_ip,
            listener: None,
            armed: false,
            stream: None,
            peer: None,
            peer_closed: false,
            peek_buf: vec![0; window.max(FRAME_LEN)],
        }
    }

    /// Address the listener is bound to, while one exists.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    fn try_accept(&mut self) -> SocketState {
        let Some(listener) = self.listener.as_ref() else {
            return SocketState::Closed;
        };
        match listener.accept() {
            Ok((stream, addr)) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    warn!("TCP: cannot make client socket non-blocking: {}", e);
                    return SocketState::Listening;
                }
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("TCP: set_nodelay failed: {}", e);
                }
                info!("TCP: accepted {}", addr);
                // Stop accepting: one ground station at a time.
                self.listener = None;
                self.armed = false;
                self.stream = Some(stream);
                self.peer = Some(addr);
                self.peer_closed = false;
                SocketState::Established
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => SocketState::Listening,
            Err(e) => {
                warn!("TCP: accept error: {}", e);
                SocketState::Listening
            }
        }
    }

    /// Peek the stream.  Returns buffered octets, marking the peer closed
    /// on EOF or a hard error.
    fn peek(&mut self) -> usize {
        let Some(stream) = self.stream.as_ref() else {
            return 0;
        };
        match stream.peek(&mut self.peek_buf) {
            Ok(0) => {
                debug!("TCP: peer sent FIN");
                self.peer_closed = true;
                0
            }
            Ok(n) => n,
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => 0,
            Err(e) => {
                warn!("TCP: peek error: {}", e);
                self.peer_closed = true;
                0
            }
        }
    }
}

impl Transport for TcpTransport {
    fn socket_state(&mut self) -> SocketState {
        if self.stream.is_some() {
            self.peek();
            return if self.peer_closed {
                SocketState::PeerClosing
            } else {
                SocketState::Established
            };
        }
        if self.armed {
            return self.try_accept();
        }
        SocketState::Closed
    }

    fn bytes_available(&mut self) -> usize {
        self.peek()
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        match stream.read(buf) {
            Ok(0) if !buf.is_empty() => {
                self.peer_closed = true;
                Err(TransportError::ReceiveFailed)
            }
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(e) => {
                warn!("TCP: read error: {}", e);
                self.peer_closed = true;
                Err(TransportError::ReceiveFailed)
            }
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        match stream.write(data) {
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(e) => {
                warn!("TCP: write error: {}", e);
                self.peer_closed = true;
                Err(TransportError::SendFailed)
            }
        }
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(stream) = self.stream.take() {
            // The peer may already be gone; shutdown errors are expected.
            let _ = stream.shutdown(Shutdown::Both);
            info!("TCP: disconnected {:?}", self.peer);
        }
        self.peer = None;
        self.peer_closed = false;
        self.listener = None;
        self.armed = false;
        Ok(())
    }

    fn listen(&mut self) -> Result<(), TransportError> {
        if self.listener.is_none() {
            return Err(TransportError::ListenFailed);
        }
        self.armed = true;
        Ok(())
    }

    fn bind(&mut self, port: u16) -> Result<(), TransportError> {
        // Release any previous socket before rebinding the same port.
        self.listener = None;
        self.armed = false;

        let listener = TcpListener::bind(SocketAddr::new(self.bind_ip, port)).map_err(|e| {
            warn!("TCP: bind {}:{} failed: {}", self.bind_ip, port, e);
            TransportError::BindFailed
        })?;
        listener.set_nonblocking(true).map_err(|e| {
            warn!("TCP: set_nonblocking failed: {}", e);
            TransportError::BindFailed
        })?;
        self.listener = Some(listener);
        Ok(())
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
