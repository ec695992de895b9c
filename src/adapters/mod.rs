//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements | Connects to                       |
//! |-----------------|------------|-----------------------------------|
//! | `hardware`      | GpioPort   | ESP32 GPIO / embedded-hal pins    |
//! | `log_sink`      | EventSink  | Serial / stderr log output        |
//! | `tcp_transport` | Transport  | Single-client TCP server          |
//!
//! The ignition UART lives in [`drivers::uart`](crate::drivers::uart).

pub mod hardware;
pub mod log_sink;
pub mod tcp_transport;
