//! Fuzz target: `router::handle_frame`
//!
//! Feeds arbitrary 8-octet frames through the router and checks:
//! - No panics under any frame
//! - The reply always echoes the request header
//! - Fill and dump are never left open together after a dump request
//!
//! cargo fuzz run fuzz_router

#![no_main]

use gse_valve::app::ports::{GpioPort, Level, Pin};
use gse_valve::app::router::handle_frame;
use gse_valve::app::valves::{Valve, ValveBank, ValveState};
use gse_valve::protocol::codec::{decode, FRAME_LEN};
use gse_valve::protocol::vocab::{Subsystem, Action};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Latch([Level; Pin::COUNT]);

impl GpioPort for Latch {
    fn set_output(&mut self, pin: Pin, level: Level) {
        self.0[pin.index()] = level;
    }

    fn get_input(&mut self, pin: Pin) -> Level {
        self.0[pin.index()]
    }
}

fuzz_target!(|data: &[u8]| {
    let mut bank = ValveBank::new(Latch::default());

    for chunk in data.chunks_exact(FRAME_LEN) {
        let mut frame = [0u8; FRAME_LEN];
        frame.copy_from_slice(chunk);
        let (header, command) = decode(&frame);

        let (reply, _) = handle_frame(&mut bank, &frame);
        assert_eq!(decode(&reply).0, header);

        if Subsystem::from_wire(header) == Subsystem::Dump
            && matches!(Action::from_wire(command), Action::Open | Action::Close)
        {
            assert_eq!(bank.state(Valve::N2OFill), ValveState::Closed);
        }
    }
});
