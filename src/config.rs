//! System configuration parameters
//!
//! Static configuration owned by the bring-up layer: network identity,
//! control port, pin wiring and loop timing.  Nothing here is read from
//! files or the environment; the defaults describe the flight-line board.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pins;
use crate::protocol::codec::FRAME_LEN;

/// Default TCP port the ground station connects to.
pub const DEFAULT_CONTROL_PORT: u16 = 5000;

/// Static network identity of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub mac: [u8; 6],
    pub ip: [u8; 4],
    pub subnet: [u8; 4],
    pub gateway: [u8; 4],
    pub dns: [u8; 4],
    /// DHCP is never used on the test stand network; kept for bench setups.
    pub dhcp: bool,
    /// TCP port of the single control connection.
    pub control_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mac: [0x00, 0x08, 0xDC, 0x12, 0x34, 0x56],
            ip: [192, 168, 100, 100],
            subnet: [255, 255, 255, 0],
            gateway: [192, 168, 100, 1],
            dns: [8, 8, 8, 8],
            dhcp: false,
            control_port: DEFAULT_CONTROL_PORT,
        }
    }
}

/// GPIO number for every logical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMap {
    pub o2_valve: i32,
    pub o2_indicator: i32,
    pub fill_valve: i32,
    pub fill_indicator: i32,
    pub dump_valve: i32,
    pub dump_indicator: i32,
}

impl PinMap {
    /// All six GPIO numbers, valves first.
    pub fn all(&self) -> [i32; 6] {
        [
            self.o2_valve,
            self.fill_valve,
            self.dump_valve,
            self.o2_indicator,
            self.fill_indicator,
            self.dump_indicator,
        ]
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            o2_valve: pins::O2_VALVE_GPIO,
            o2_indicator: pins::INDICATOR_O2_VALVE_GPIO,
            fill_valve: pins::N2O_FILL_VALVE_GPIO,
            fill_indicator: pins::INDICATOR_N2O_FILL_VALVE_GPIO,
            dump_valve: pins::N2O_DUMP_VALVE_GPIO,
            dump_indicator: pins::INDICATOR_N2O_DUMP_VALVE_GPIO,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GseConfig {
    pub network: NetworkConfig,
    pub pins: PinMap,

    // --- Timing ---
    /// Delay between supervisor polls (milliseconds).
    pub poll_interval_ms: u32,
    /// Log link statistics every N polls (0 disables).
    pub stats_interval_polls: u32,
    /// Task watchdog budget (milliseconds).  A stalled loop resets the
    /// board, which boots with every valve closed.
    pub watchdog_timeout_ms: u32,

    // --- Buffers ---
    /// Receive buffer size (octets).  Surplus beyond one frame is dropped.
    pub rx_buffer_size: usize,

    // --- Ignition controller link ---
    /// Read attempts while waiting for the one-octet acknowledgement.
    pub ignition_ack_poll_limit: u32,
}

impl Default for GseConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            pins: PinMap::default(),
            poll_interval_ms: 1,
            stats_interval_polls: 60_000,
            watchdog_timeout_ms: 2_000,
            rx_buffer_size: 2048,
            ignition_ack_poll_limit: 1000,
        }
    }
}

impl GseConfig {
    /// Reject configurations that would make the controller unsafe or
    /// unreachable.
    pub fn validate(&self) -> crate::Result<()> {
        if self.network.control_port == 0 {
            return Err(Error::Config("control_port must be non-zero"));
        }
        if self.rx_buffer_size < FRAME_LEN {
            return Err(Error::Config("rx_buffer_size smaller than one frame"));
        }
        if self.watchdog_timeout_ms <= self.poll_interval_ms {
            return Err(Error::Config("watchdog_timeout_ms must exceed poll_interval_ms"));
        }
        if self.ignition_ack_poll_limit == 0 {
            return Err(Error::Config("ignition_ack_poll_limit must be non-zero"));
        }
        let all = self.pins.all();
        for (i, a) in all.iter().enumerate() {
            if all[i + 1..].contains(a) {
                return Err(Error::Config("two logical outputs share one GPIO"));
            }
        }
        Ok(())
    }
}
