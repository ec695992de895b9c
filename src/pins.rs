//! GPIO / peripheral pin assignments for the GSE valve controller board.
//!
//! Single source of truth for the default wiring.  The runtime copy lives
//! in [`PinMap`](crate::config::PinMap) so a board revision can be
//! described in configuration without touching the drivers.

// ---------------------------------------------------------------------------
// Solenoid valve drivers (low-side MOSFET, active HIGH = valve open)
// ---------------------------------------------------------------------------

/// Ignition oxidizer (O2) solenoid.
pub const O2_VALVE_GPIO: i32 = 9;
/// N2O run-tank fill solenoid.
pub const N2O_FILL_VALVE_GPIO: i32 = 10;
/// N2O dump / purge solenoid (one physical valve, two logical uses).
pub const N2O_DUMP_VALVE_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Panel indicator LEDs (mirror the valve outputs)
// ---------------------------------------------------------------------------

/// Panel LED for the O2 valve.
pub const INDICATOR_O2_VALVE_GPIO: i32 = 14;
pub const INDICATOR_N2O_FILL_VALVE_GPIO: i32 = 12;
pub const INDICATOR_N2O_DUMP_VALVE_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Ignition controller link (RS-232 via level shifter)
// ---------------------------------------------------------------------------

pub const IGNITION_UART_NUM: i32 = 1;
pub const IGNITION_UART_TX_GPIO: i32 = 0;
pub const IGNITION_UART_RX_GPIO: i32 = 1;
pub const IGNITION_UART_BAUD: u32 = 115_200;
