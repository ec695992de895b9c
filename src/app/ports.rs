//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ValveBank / Supervisor (domain)
//! ```
//!
//! Driven adapters (GPIO, serial, event sinks) implement these traits.
//! The domain core consumes them via generics, so it never touches
//! hardware directly.

use crate::config::PinMap;

// ───────────────────────────────────────────────────────────────
// Pin identity
// ───────────────────────────────────────────────────────────────

/// Logical output pins.  The GPIO number behind each is board wiring,
/// resolved through [`PinMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Pin {
    O2Valve = 0,
    O2Indicator = 1,
    FillValve = 2,
    FillIndicator = 3,
    DumpValve = 4,
    DumpIndicator = 5,
}

impl Pin {
    /// Total number of logical pins; sizes adapter tables.
    pub const COUNT: usize = 6;

    pub const ALL: [Pin; Pin::COUNT] = [
        Pin::O2Valve,
        Pin::O2Indicator,
        Pin::FillValve,
        Pin::FillIndicator,
        Pin::DumpValve,
        Pin::DumpIndicator,
    ];

    /// Index into a `[_; Pin::COUNT]` table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Board GPIO number for this pin.
    pub fn gpio(self, map: &PinMap) -> i32 {
        match self {
            Self::O2Valve => map.o2_valve,
            Self::O2Indicator => map.o2_indicator,
            Self::FillValve => map.fill_valve,
            Self::FillIndicator => map.fill_indicator,
            Self::DumpValve => map.dump_valve,
            Self::DumpIndicator => map.dump_indicator,
        }
    }
}

/// Digital level.  `High` energises a valve / lights an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain ↔ pins)
// ───────────────────────────────────────────────────────────────

/// Digital I/O on the six named pins.
///
/// Writes are non-failing by contract: an adapter whose HAL can report
/// errors logs them and carries on.  Reads return the level the output
/// latch currently holds, which is the valve state.
pub trait GpioPort {
    fn set_output(&mut self, pin: Pin, level: Level);

    fn get_input(&mut self, pin: Pin) -> Level;
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: ignition controller link)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented serial channel to the ignition controller.
pub trait SerialPort {
    /// Error type for this port.
    type Error: core::fmt::Debug;

    /// Write `data`, returning the number of octets accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` octets.  Returns 0 if nothing is pending
    /// (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
