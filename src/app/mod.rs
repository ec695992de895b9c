//! Application core: pure domain logic, zero I/O.
//!
//! Valve sequencing with its interlocks, and the command router that maps
//! wire requests onto it.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ignition;
pub mod ports;
pub mod router;
pub mod valves;
