//! Control-channel protocol.
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌────────────────┐   ┌──────────┐
//! │ Transport  │──▶│  Codec   │──▶│ Router         │──▶│ Valves   │
//! │ (trait)    │   │ (decode) │   │ (Subsystem ×   │   │          │
//! └────────────┘   └──────────┘   │  Action)       │   └──────────┘
//!       ▲          ┌──────────┐   └───────┬────────┘
//!       └──────────│  Codec   │◀──────────┘
//!                  │ (encode) │   reply: header ‖ result
//!                  └──────────┘
//! ```

pub mod codec;
pub mod transport;
pub mod vocab;
