//! Poll-driven supervisor for the single control connection.
//!
//! Each call to [`Supervisor::poll`] observes the transport once, advances
//! the [`ConnectionPhase`] and, while established, services at most one
//! request frame.  Nothing here blocks: the binary calls `poll` from its
//! main loop at the configured cadence.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, GpioPort};
use crate::app::router::{self, Reply};
use crate::app::valves::{ValveBank, ValveSnapshot};
use crate::config::GseConfig;
use crate::diagnostics::{LinkStats, hex_dump};
use crate::error::TransportError;
use crate::protocol::codec::{self, FRAME_LEN};
use crate::protocol::transport::{SocketState, Transport};

use super::ConnectionPhase;

/// Hex characters of a received payload kept in the debug log.
const HEX_DUMP_CHARS: usize = 64;

/// Owns the transport and the valve bank; nothing else touches either.
pub struct Supervisor<T: Transport, G: GpioPort> {
    transport: T,
    bank: ValveBank<G>,
    phase: ConnectionPhase,
    port: u16,
    rx_buf: Vec<u8>,
    stats: LinkStats,
    /// Consecutive failed bind/listen attempts; only the first is a warning.
    open_failures: u32,
}

impl<T: Transport, G: GpioPort> Supervisor<T, G> {
    pub fn new(transport: T, bank: ValveBank<G>, config: &GseConfig) -> Self {
        Self {
            transport,
            bank,
            phase: ConnectionPhase::Closed,
            port: config.network.control_port,
            rx_buf: vec![0; config.rx_buffer_size.max(FRAME_LEN)],
            stats: LinkStats::default(),
            open_failures: 0,
        }
    }

    /// Announce ownership of the valves.  Call once before the first poll.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "Supervisor starting in phase {} on port {}",
            self.phase, self.port
        );
        sink.emit(&AppEvent::Started { port: self.port });
    }

    /// Observe the transport once and advance the connection lifecycle.
    pub fn poll(&mut self, sink: &mut impl EventSink) -> ConnectionPhase {
        self.stats.polls = self.stats.polls.wrapping_add(1);
        let observed = self.transport.socket_state();

        match self.phase {
            ConnectionPhase::Closed => self.poll_closed(observed, sink),
            ConnectionPhase::Listening => self.poll_listening(observed, sink),
            ConnectionPhase::Established => self.poll_established(observed, sink),
            ConnectionPhase::PeerClosing => self.finish_close(sink),
        }
        self.phase
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn valves(&mut self) -> ValveSnapshot {
        self.bank.snapshot()
    }

    pub fn bank(&self) -> &ValveBank<G> {
        &self.bank
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // ── Per-phase handlers ────────────────────────────────────

    fn poll_closed(&mut self, observed: SocketState, sink: &mut impl EventSink) {
        match observed {
            SocketState::Closed => self.open_listener(sink),
            SocketState::Listening => self.enter(ConnectionPhase::Listening, sink),
            // The stack is ahead of us; go through Listening so the
            // accept is reported on the next poll.
            SocketState::Established => self.enter(ConnectionPhase::Listening, sink),
            SocketState::PeerClosing => {
                // Stale connection from before we owned the socket.
                if let Err(e) = self.transport.disconnect() {
                    self.transport_fault(e, sink);
                }
            }
        }
    }

    fn poll_listening(&mut self, observed: SocketState, sink: &mut impl EventSink) {
        match observed {
            SocketState::Listening => {}
            SocketState::Established => {
                self.stats.links_established = self.stats.links_established.wrapping_add(1);
                self.enter(ConnectionPhase::Established, sink);
                let peer = self.transport.peer_addr();
                match peer {
                    Some(addr) => info!("Connected {}", addr),
                    None => info!("Connected"),
                }
                sink.emit(&AppEvent::LinkUp { peer });
                self.service(sink);
            }
            SocketState::Closed => {
                warn!("Listener lost before a peer connected");
                self.enter(ConnectionPhase::Closed, sink);
            }
            // Connected and already gone between two polls.
            SocketState::PeerClosing => self.begin_close(sink),
        }
    }

    fn poll_established(&mut self, observed: SocketState, sink: &mut impl EventSink) {
        match observed {
            SocketState::Established => self.service(sink),
            SocketState::PeerClosing => {
                info!("Peer closed the control link");
                self.begin_close(sink);
            }
            SocketState::Closed | SocketState::Listening => {
                warn!("Control link dropped without a close ({:?})", observed);
                self.begin_close(sink);
            }
        }
    }

    // ── Closed: bind + listen ─────────────────────────────────

    fn open_listener(&mut self, sink: &mut impl EventSink) {
        let opened = self
            .transport
            .bind(self.port)
            .and_then(|()| self.transport.listen());

        match opened {
            Ok(()) => {
                self.open_failures = 0;
                info!("Listening on port {}", self.port);
                self.enter(ConnectionPhase::Listening, sink);
            }
            Err(e) => {
                self.open_failures = self.open_failures.saturating_add(1);
                self.stats.transport_errors = self.stats.transport_errors.wrapping_add(1);
                if self.open_failures == 1 {
                    warn!("Cannot open control socket: {} (retrying every poll)", e);
                    sink.emit(&AppEvent::TransportError(e));
                } else {
                    debug!("open attempt {} failed: {}", self.open_failures, e);
                }
            }
        }
    }

    // ── Established: one frame per poll ───────────────────────

    fn service(&mut self, sink: &mut impl EventSink) {
        let available = self.transport.bytes_available();
        if available < FRAME_LEN {
            return;
        }

        let want = available.min(self.rx_buf.len());
        let n = match self.transport.receive(&mut self.rx_buf[..want]) {
            Ok(n) => n.min(want),
            Err(e) => {
                self.transport_fault(e, sink);
                self.begin_close(sink);
                return;
            }
        };

        let payload = &self.rx_buf[..n];
        debug!(
            "rx {} octets: {}",
            n,
            hex_dump::<HEX_DUMP_CHARS>(payload).as_str()
        );

        let Some((header, command)) = codec::decode_prefix(payload) else {
            warn!("Receive yielded {} of {} octets; discarded", n, available);
            self.stats.dropped_octets = self.stats.dropped_octets.wrapping_add(n as u64);
            return;
        };
        if n > FRAME_LEN {
            let surplus = n - FRAME_LEN;
            debug!("dropping {} surplus octets", surplus);
            self.stats.surplus_octets = self.stats.surplus_octets.wrapping_add(surplus as u64);
        }

        let routed = router::route(&mut self.bank, header, command);
        self.stats.frames_handled = self.stats.frames_handled.wrapping_add(1);
        if let Some(e) = routed.error {
            warn!("Rejected request: {}", e);
            self.stats.protocol_errors = self.stats.protocol_errors.wrapping_add(1);
            sink.emit(&AppEvent::ProtocolError(e));
        }
        sink.emit(&AppEvent::FrameHandled {
            header,
            command,
            result: routed.result,
        });

        if !routed.send_reply {
            return;
        }
        let reply = Reply {
            header,
            result: routed.result,
        }
        .to_frame();
        let sent = match self.transport.send(&reply) {
            Ok(FRAME_LEN) => return,
            Ok(sent) => TransportError::ShortSend { sent },
            Err(e) => e,
        };
        self.transport_fault(sent, sink);
        self.begin_close(sink);
    }

    // ── Close path ────────────────────────────────────────────

    /// Enter `PeerClosing` and try the local disconnect right away.
    fn begin_close(&mut self, sink: &mut impl EventSink) {
        self.stats.link_losses = self.stats.link_losses.wrapping_add(1);
        self.enter(ConnectionPhase::PeerClosing, sink);
        self.finish_close(sink);
    }

    /// `PeerClosing -> Closed`.  The emergency shutdown fires here and
    /// nowhere else.
    fn finish_close(&mut self, sink: &mut impl EventSink) {
        if let Err(e) = self.transport.disconnect() {
            warn!("Disconnect failed: {} (retrying next poll)", e);
            self.stats.transport_errors = self.stats.transport_errors.wrapping_add(1);
            sink.emit(&AppEvent::TransportError(e));
            return;
        }

        let valves = self.bank.emergency_shutdown();
        self.stats.emergency_shutdowns = self.stats.emergency_shutdowns.wrapping_add(1);
        error!(
            "SAFETY: control link lost, emergency shutdown (o2={:?} fill={:?} dump={:?})",
            valves.o2, valves.fill, valves.dump
        );
        sink.emit(&AppEvent::EmergencyShutdown { valves });
        self.enter(ConnectionPhase::Closed, sink);
    }

    // ── Internal ──────────────────────────────────────────────

    fn transport_fault(&mut self, e: TransportError, sink: &mut impl EventSink) {
        warn!("Transport error: {}", e);
        self.stats.transport_errors = self.stats.transport_errors.wrapping_add(1);
        sink.emit(&AppEvent::TransportError(e));
    }

    fn enter(&mut self, next: ConnectionPhase, sink: &mut impl EventSink) {
        if next == self.phase {
            return;
        }
        info!("LINK transition: {} -> {}", self.phase, next);
        sink.emit(&AppEvent::PhaseChanged {
            from: self.phase,
            to: next,
        });
        self.phase = next;
    }
}
