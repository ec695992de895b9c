//! Fuzz target: `Supervisor::poll`
//!
//! Interprets the input as a script of peer behaviour (connect, send
//! bytes, close, fail) against an in-memory transport and checks:
//! - No panics under any script
//! - Every lost link fires exactly one emergency shutdown
//! - All valves read closed after each shutdown
//!
//! cargo fuzz run fuzz_supervisor

#![no_main]

use std::collections::VecDeque;

use gse_valve::app::events::AppEvent;
use gse_valve::app::ports::{EventSink, GpioPort, Level, Pin};
use gse_valve::app::valves::ValveBank;
use gse_valve::config::GseConfig;
use gse_valve::error::TransportError;
use gse_valve::link::{ConnectionPhase, Supervisor};
use gse_valve::protocol::transport::{SocketState, Transport};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Latch([Level; Pin::COUNT]);

impl GpioPort for Latch {
    fn set_output(&mut self, pin: Pin, level: Level) {
        self.0[pin.index()] = level;
    }

    fn get_input(&mut self, pin: Pin) -> Level {
        self.0[pin.index()]
    }
}

struct FuzzTransport {
    state: SocketState,
    rx: VecDeque<u8>,
    fail_next: bool,
}

impl Transport for FuzzTransport {
    fn socket_state(&mut self) -> SocketState {
        self.state
    }

    fn bytes_available(&mut self) -> usize {
        self.rx.len()
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(TransportError::ReceiveFailed);
        }
        let n = buf.len().min(self.rx.len());
        for (slot, b) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        Ok(data.len())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(TransportError::DisconnectFailed);
        }
        self.state = SocketState::Closed;
        self.rx.clear();
        Ok(())
    }

    fn listen(&mut self) -> Result<(), TransportError> {
        self.state = SocketState::Listening;
        Ok(())
    }

    fn bind(&mut self, _port: u16) -> Result<(), TransportError> {
        Ok(())
    }
}

#[derive(Default)]
struct Count(usize);

impl EventSink for Count {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::EmergencyShutdown { valves } = event {
            assert!(valves.all_closed());
            self.0 += 1;
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let transport = FuzzTransport {
        state: SocketState::Closed,
        rx: VecDeque::new(),
        fail_next: false,
    };
    let mut sup = Supervisor::new(
        transport,
        ValveBank::new(Latch::default()),
        &GseConfig::default(),
    );
    let mut sink = Count::default();

    let mut bytes = data.iter().copied();
    while let Some(op) = bytes.next() {
        match op % 6 {
            0 => sup.transport_mut().state = SocketState::Established,
            1 => sup.transport_mut().state = SocketState::PeerClosing,
            2 => sup.transport_mut().state = SocketState::Closed,
            3 => sup.transport_mut().fail_next = true,
            _ => {
                let len = usize::from(op >> 3);
                sup.transport_mut().rx.extend(bytes.by_ref().take(len));
            }
        }

        let phase = sup.poll(&mut sink);
        let stats = *sup.stats();
        assert_eq!(sink.0, stats.emergency_shutdowns as usize);
        // One shutdown per lost link; only a pending close may lag behind.
        let pending = u32::from(phase == ConnectionPhase::PeerClosing);
        assert_eq!(stats.link_losses, stats.emergency_shutdowns + pending);
        if phase == ConnectionPhase::Closed && stats.emergency_shutdowns > 0 {
            assert!(sup.valves().all_closed());
        }
    }
});
