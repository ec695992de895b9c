//! GSE valve controller library.
//!
//! Exposes the control core (codec, valve sequencer, router, connection
//! supervisor) for integration testing and the firmware binary.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod link;
pub mod pins;
pub mod protocol;

pub mod adapters;
pub mod drivers;

pub use error::{Error, Result};
