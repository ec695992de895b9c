//! Integration tests for the request router → valve bank → GPIO pipeline.
//!
//! Frames are built with the public codec and fed through
//! `router::handle_frame`, asserting on both the reply frame and the
//! pin writes that reached the mock GPIO.

use super::mock_hw::MockGpio;

use gse_valve::app::ports::{Level, Pin};
use gse_valve::app::router::handle_frame;
use gse_valve::app::valves::ValveBank;
use gse_valve::protocol::codec::{decode, encode};
use gse_valve::protocol::vocab::*;

fn make_bank() -> ValveBank<MockGpio> {
    ValveBank::new(MockGpio::new())
}

fn send(bank: &mut ValveBank<MockGpio>, header: u32, command: u32) -> (u32, u32) {
    let (reply, _) = handle_frame(bank, &encode(header, command));
    decode(&reply)
}

#[test]
fn boot_writes_every_pin_low_once() {
    let bank = make_bank();
    let writes = &bank.gpio().writes;
    assert_eq!(writes.len(), Pin::COUNT);
    assert!(writes.iter().all(|(_, l)| *l == Level::Low));
    assert!(bank.gpio().all_low());
}

#[test]
fn fill_then_dump_scenario() {
    let mut bank = make_bank();

    assert_eq!(send(&mut bank, HEADER_FILL, COMMAND_OPEN), (HEADER_FILL, RESULT_OPEN));
    assert_eq!(bank.gpio().level(Pin::FillValve), Level::High);
    assert_eq!(bank.gpio().level(Pin::FillIndicator), Level::High);

    assert_eq!(send(&mut bank, HEADER_DUMP, COMMAND_OPEN), (HEADER_DUMP, RESULT_OPEN));
    assert_eq!(send(&mut bank, HEADER_FILL, COMMAND_STATUS), (HEADER_FILL, RESULT_CLOSED));
    assert_eq!(send(&mut bank, HEADER_DUMP, COMMAND_STATUS), (HEADER_DUMP, RESULT_OPEN));
    assert_eq!(bank.gpio().level(Pin::FillIndicator), Level::Low);
    assert_eq!(bank.gpio().level(Pin::DumpIndicator), Level::High);
}

#[test]
fn dump_never_leaves_fill_and_dump_open_together() {
    let mut bank = make_bank();
    send(&mut bank, HEADER_FILL, COMMAND_OPEN);
    let before = bank.gpio().writes.len();
    send(&mut bank, HEADER_DUMP, COMMAND_CLOSE);

    // Dump pin first, fill pin after, within the same request.
    let writes = &bank.gpio().writes[before..];
    let dump_at = writes.iter().position(|(p, _)| *p == Pin::DumpValve).unwrap();
    let fill_at = writes.iter().position(|(p, _)| *p == Pin::FillValve).unwrap();
    assert!(dump_at < fill_at);
    assert_eq!(bank.gpio().level(Pin::FillValve), Level::Low);
}

#[test]
fn purge_shares_the_dump_valve() {
    let mut bank = make_bank();
    send(&mut bank, HEADER_FILL, COMMAND_OPEN);
    assert_eq!(send(&mut bank, HEADER_PURGE, COMMAND_OPEN), (HEADER_PURGE, RESULT_OPEN));
    assert_eq!(send(&mut bank, HEADER_DUMP, COMMAND_STATUS), (HEADER_DUMP, RESULT_OPEN));
    assert_eq!(send(&mut bank, HEADER_PURGE, COMMAND_STATUS), (HEADER_PURGE, RESULT_OPEN));
    assert_eq!(send(&mut bank, HEADER_FILL, COMMAND_STATUS), (HEADER_FILL, RESULT_OPEN));
}

#[test]
fn ignition_drives_o2_pins() {
    let mut bank = make_bank();
    assert_eq!(
        send(&mut bank, HEADER_IGNITION, COMMAND_STATUS),
        (HEADER_IGNITION, RESULT_CLOSED)
    );
    assert_eq!(
        send(&mut bank, HEADER_IGNITION, COMMAND_OPEN),
        (HEADER_IGNITION, RESULT_OPEN)
    );
    assert_eq!(bank.gpio().level(Pin::O2Valve), Level::High);
    assert_eq!(bank.gpio().level(Pin::O2Indicator), Level::High);
    assert_eq!(
        send(&mut bank, HEADER_IGNITION, COMMAND_CLOSE),
        (HEADER_IGNITION, RESULT_CLOSED)
    );
    assert_eq!(bank.gpio().level(Pin::O2Valve), Level::Low);
}

#[test]
fn bad_requests_reply_error_and_touch_nothing() {
    let mut bank = make_bank();
    send(&mut bank, HEADER_FILL, COMMAND_OPEN);
    let before = bank.gpio().writes.len();

    assert_eq!(send(&mut bank, 0xDEAD_BEEF, COMMAND_OPEN), (0xDEAD_BEEF, RESULT_ERROR));
    assert_eq!(send(&mut bank, HEADER_FILL, 0x5), (HEADER_FILL, RESULT_ERROR));
    assert_eq!(send(&mut bank, 0, 0), (0, RESULT_ERROR));

    assert_eq!(bank.gpio().writes.len(), before);
    assert_eq!(bank.gpio().level(Pin::FillValve), Level::High);
}

#[test]
fn close_replies_closed_even_when_already_closed() {
    let mut bank = make_bank();
    for header in [HEADER_FILL, HEADER_DUMP, HEADER_PURGE, HEADER_IGNITION] {
        assert_eq!(send(&mut bank, header, COMMAND_CLOSE), (header, RESULT_CLOSED));
    }
    assert!(bank.gpio().all_low());
}
