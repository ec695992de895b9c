//! Fixed-size frame codec.
//!
//! Wire format (request and reply share the layout):
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Header (4B)      │ Command / Result (4B)    │
//! │ BE u32           │ BE u32                   │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! Every `u32` pair is representable, so encode and decode are total.
//! There is no streaming decoder: the supervisor hands over exactly one
//! frame's worth of octets and drops anything past it.

/// Size of every request and reply frame on the wire.
pub const FRAME_LEN: usize = 8;

/// A raw frame as it travels on the wire.
pub type Frame = [u8; FRAME_LEN];

/// Split a frame into `(header, command)`.
pub fn decode(frame: &Frame) -> (u32, u32) {
    let header = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
    let command = u32::from_be_bytes([frame[4], frame[5], frame[6], frame[7]]);
    (header, command)
}

/// Build a frame from `(header, value)`.
pub fn encode(header: u32, value: u32) -> Frame {
    let mut out = [0u8; FRAME_LEN];
    out[..4].copy_from_slice(&header.to_be_bytes());
    out[4..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Truncate a received buffer to one frame and decode it.
///
/// Returns `None` when fewer than [`FRAME_LEN`] octets are present.
/// Octets past the first frame are ignored.
pub fn decode_prefix(buf: &[u8]) -> Option<(u32, u32)> {
    let frame: &Frame = buf.get(..FRAME_LEN)?.try_into().ok()?;
    Some(decode(frame))
}
