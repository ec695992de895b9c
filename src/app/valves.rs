//! Valve sequencer: the only owner of the solenoid outputs.
//!
//! Three solenoids, each mirrored by a panel indicator:
//!
//! | Valve     | Valve pin   | Indicator pin   | Wire subsystems |
//! |-----------|-------------|-----------------|-----------------|
//! | `O2`      | `O2Valve`   | `O2Indicator`   | Ignition        |
//! | `N2OFill` | `FillValve` | `FillIndicator` | Fill            |
//! | `N2ODump` | `DumpValve` | `DumpIndicator` | Dump, Purge     |
//!
//! ## Safety contract
//!
//! Venting must never coincide with filling.  Both dump operations drive
//! the dump valve first and then force the fill valve closed, in that
//! order, before returning.  Purge drives the same physical valve as dump
//! but carries no interlock.
//!
//! There is no cached state: the valve state *is* the output latch, and
//! every status query reads it back through [`GpioPort::get_input`].

use log::{debug, info};

use super::ports::{GpioPort, Level, Pin};
use crate::protocol::vocab::ReplyCode;

/// Physical solenoid valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Valve {
    /// Ignition oxidizer.
    O2,
    N2OFill,
    N2ODump,
}

impl Valve {
    pub const ALL: [Valve; 3] = [Valve::O2, Valve::N2OFill, Valve::N2ODump];

    /// `(valve pin, indicator pin)`.
    pub const fn pins(self) -> (Pin, Pin) {
        match self {
            Self::O2 => (Pin::O2Valve, Pin::O2Indicator),
            Self::N2OFill => (Pin::FillValve, Pin::FillIndicator),
            Self::N2ODump => (Pin::DumpValve, Pin::DumpIndicator),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValveState {
    #[default]
    Closed,
    Open,
}

impl ValveState {
    pub const fn level(self) -> Level {
        match self {
            Self::Closed => Level::Low,
            Self::Open => Level::High,
        }
    }

    pub const fn reply(self) -> ReplyCode {
        match self {
            Self::Closed => ReplyCode::Closed,
            Self::Open => ReplyCode::Open,
        }
    }
}

impl From<Level> for ValveState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => Self::Closed,
            Level::High => Self::Open,
        }
    }
}

/// Point-in-time read-back of all three valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValveSnapshot {
    pub o2: ValveState,
    pub fill: ValveState,
    pub dump: ValveState,
}

impl ValveSnapshot {
    pub fn all_closed(&self) -> bool {
        *self == Self::default()
    }
}

/// The valve bank.  Owns the GPIO port; raw pin writes never leave it.
pub struct ValveBank<G: GpioPort> {
    gpio: G,
}

impl<G: GpioPort> ValveBank<G> {
    /// Take ownership of the outputs and drive all six low.
    pub fn new(gpio: G) -> Self {
        let mut bank = Self { gpio };
        for pin in Pin::ALL {
            bank.gpio.set_output(pin, Level::Low);
        }
        info!("ValveBank: all valves closed at boot");
        bank
    }

    // ── Fill ──────────────────────────────────────────────────

    pub fn fill_open(&mut self) -> ReplyCode {
        self.drive(Valve::N2OFill, ValveState::Open)
    }

    pub fn fill_close(&mut self) -> ReplyCode {
        self.drive(Valve::N2OFill, ValveState::Closed)
    }

    pub fn fill_status(&mut self) -> ReplyCode {
        self.state(Valve::N2OFill).reply()
    }

    // ── Dump (interlocked with fill) ──────────────────────────

    pub fn dump_open(&mut self) -> ReplyCode {
        let result = self.drive(Valve::N2ODump, ValveState::Open);
        self.drive(Valve::N2OFill, ValveState::Closed);
        result
    }

    pub fn dump_close(&mut self) -> ReplyCode {
        let result = self.drive(Valve::N2ODump, ValveState::Closed);
        self.drive(Valve::N2OFill, ValveState::Closed);
        result
    }

    pub fn dump_status(&mut self) -> ReplyCode {
        self.state(Valve::N2ODump).reply()
    }

    // ── Purge (same valve as dump, no interlock) ──────────────

    pub fn purge_open(&mut self) -> ReplyCode {
        self.drive(Valve::N2ODump, ValveState::Open)
    }

    pub fn purge_close(&mut self) -> ReplyCode {
        self.drive(Valve::N2ODump, ValveState::Closed)
    }

    // ── Ignition oxidizer ─────────────────────────────────────

    pub fn ignition_open(&mut self) -> ReplyCode {
        self.drive(Valve::O2, ValveState::Open)
    }

    pub fn ignition_close(&mut self) -> ReplyCode {
        self.drive(Valve::O2, ValveState::Closed)
    }

    pub fn ignition_status(&mut self) -> ReplyCode {
        self.state(Valve::O2).reply()
    }

    // ── Safety ────────────────────────────────────────────────

    /// Force every valve and indicator closed, whatever they hold now.
    /// Returns the read-back after the writes.
    pub fn emergency_shutdown(&mut self) -> ValveSnapshot {
        for valve in Valve::ALL {
            self.drive(valve, ValveState::Closed);
        }
        self.snapshot()
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current state of one valve, read from its output pin.
    pub fn state(&mut self, valve: Valve) -> ValveState {
        self.gpio.get_input(valve.pins().0).into()
    }

    pub fn snapshot(&mut self) -> ValveSnapshot {
        ValveSnapshot {
            o2: self.state(Valve::O2),
            fill: self.state(Valve::N2OFill),
            dump: self.state(Valve::N2ODump),
        }
    }

    /// Read-only access to the port (test inspection).
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    // ── Internal ──────────────────────────────────────────────

    /// Valve pin first, then its indicator.
    fn drive(&mut self, valve: Valve, state: ValveState) -> ReplyCode {
        let (valve_pin, indicator_pin) = valve.pins();
        self.gpio.set_output(valve_pin, state.level());
        self.gpio.set_output(indicator_pin, state.level());
        debug!("valve {:?} -> {:?}", valve, state);
        state.reply()
    }
}
