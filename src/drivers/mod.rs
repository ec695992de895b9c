//! Hardware initialisation and peripheral drivers.

pub mod hw_init;
pub mod uart;
pub mod watchdog;
