//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART console on the board, stderr on host).  Safety events
//! are logged at `error` so they survive any reasonable log filter.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one tagged line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { port } => {
                info!("START | valves closed, control port {}", port);
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("LINK | {} -> {}", from, to);
            }
            AppEvent::LinkUp { peer } => match peer {
                Some(addr) => info!("LINK | ground station {} connected", addr),
                None => info!("LINK | ground station connected"),
            },
            AppEvent::FrameHandled {
                header,
                command,
                result,
            } => {
                info!(
                    "VALVE | header=0x{:08x} command=0x{:08x} -> {:?} (0x{:08x})",
                    header,
                    command,
                    result,
                    result.to_wire()
                );
            }
            AppEvent::ProtocolError(e) => {
                warn!("VALVE | rejected: {}", e);
            }
            AppEvent::TransportError(e) => {
                warn!("LINK | transport: {}", e);
            }
            AppEvent::EmergencyShutdown { valves } => {
                error!(
                    "SAFETY | emergency shutdown | o2={:?} fill={:?} dump={:?}",
                    valves.o2, valves.fill, valves.dump
                );
            }
        }
    }
}
