//! Integration tests for the connection supervisor.
//!
//! Drives `Supervisor::poll` against a scripted transport and checks the
//! phase sequence, the replies on the wire and, above all, that every
//! lost link produces exactly one emergency shutdown.

use super::mock_hw::{MockGpio, MockTransport, RecordingSink};

use gse_valve::app::events::AppEvent;
use gse_valve::app::ports::{Level, Pin};
use gse_valve::app::valves::ValveBank;
use gse_valve::config::GseConfig;
use gse_valve::error::TransportError;
use gse_valve::link::{ConnectionPhase, Supervisor};
use gse_valve::protocol::codec::{decode, encode};
use gse_valve::protocol::vocab::*;

type Sup = Supervisor<MockTransport, MockGpio>;

fn make_supervisor() -> (Sup, RecordingSink) {
    let config = GseConfig::default();
    let bank = ValveBank::new(MockGpio::new());
    let mut sup = Supervisor::new(MockTransport::new(), bank, &config);
    let mut sink = RecordingSink::new();
    sup.start(&mut sink);
    (sup, sink)
}

/// Poll until listening, then connect a peer and poll once more.
fn establish(sup: &mut Sup, sink: &mut RecordingSink) {
    assert_eq!(sup.poll(sink), ConnectionPhase::Listening);
    sup.transport_mut().connect("192.168.100.1:40000");
    assert_eq!(sup.poll(sink), ConnectionPhase::Established);
}

fn request(sup: &mut Sup, sink: &mut RecordingSink, header: u32, command: u32) -> (u32, u32) {
    sup.transport_mut().push(&encode(header, command));
    sup.poll(sink);
    let tx = sup.transport_mut().take_tx();
    assert_eq!(tx.len(), 8, "exactly one reply frame per request");
    decode(&tx[..8].try_into().unwrap())
}

fn open_everything(sup: &mut Sup, sink: &mut RecordingSink) {
    request(sup, sink, HEADER_IGNITION, COMMAND_OPEN);
    request(sup, sink, HEADER_PURGE, COMMAND_OPEN);
    request(sup, sink, HEADER_FILL, COMMAND_OPEN);
    let v = sup.valves();
    assert!(!v.all_closed());
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn starts_closed_and_binds_configured_port() {
    let (mut sup, mut sink) = make_supervisor();
    assert_eq!(sup.phase(), ConnectionPhase::Closed);
    assert!(matches!(sink.events[0], AppEvent::Started { port: 5000 }));

    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Listening);
    assert_eq!(sup.transport().binds, vec![5000]);
    assert_eq!(sup.transport().listens, 1);
}

#[test]
fn failed_listen_stays_closed_and_retries_every_poll() {
    let (mut sup, mut sink) = make_supervisor();
    sup.transport_mut().fail_listen = true;

    for _ in 0..3 {
        assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    }
    assert_eq!(sup.transport().binds.len(), 3);
    assert_eq!(sup.stats().transport_errors, 3);

    sup.transport_mut().fail_listen = false;
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Listening);
    assert_eq!(sink.shutdowns(), 0);
}

#[test]
fn failed_bind_skips_listen() {
    let (mut sup, mut sink) = make_supervisor();
    sup.transport_mut().fail_bind = true;
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    assert_eq!(sup.transport().listens, 0);
}

#[test]
fn link_up_reports_peer() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);
    let peer = sink.events.iter().find_map(|e| match e {
        AppEvent::LinkUp { peer } => Some(*peer),
        _ => None,
    });
    assert_eq!(peer, Some("192.168.100.1:40000".parse().ok()));
    assert_eq!(sup.stats().links_established, 1);
}

// ── Servicing ─────────────────────────────────────────────────

#[test]
fn replies_echo_header_with_result() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);

    assert_eq!(
        request(&mut sup, &mut sink, HEADER_FILL, COMMAND_OPEN),
        (HEADER_FILL, RESULT_OPEN)
    );
    assert_eq!(
        request(&mut sup, &mut sink, HEADER_DUMP, COMMAND_OPEN),
        (HEADER_DUMP, RESULT_OPEN)
    );
    assert_eq!(
        request(&mut sup, &mut sink, HEADER_FILL, COMMAND_STATUS),
        (HEADER_FILL, RESULT_CLOSED)
    );
    assert_eq!(sup.stats().frames_handled, 3);
}

#[test]
fn unknown_request_keeps_link_open() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);

    assert_eq!(
        request(&mut sup, &mut sink, 0xDEAD_BEEF, COMMAND_OPEN),
        (0xDEAD_BEEF, RESULT_ERROR)
    );
    assert_eq!(sup.phase(), ConnectionPhase::Established);
    assert_eq!(sup.stats().protocol_errors, 1);
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::ProtocolError(_))));
}

#[test]
fn partial_frame_waits_in_transport() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);

    let frame = encode(HEADER_FILL, COMMAND_OPEN);
    sup.transport_mut().push(&frame[..5]);
    sup.poll(&mut sink);
    assert!(sup.transport().tx.is_empty());
    assert_eq!(sup.transport().rx.len(), 5);

    sup.transport_mut().push(&frame[5..]);
    sup.poll(&mut sink);
    assert_eq!(
        decode(&sup.transport_mut().take_tx()[..8].try_into().unwrap()),
        (HEADER_FILL, RESULT_OPEN)
    );
}

#[test]
fn surplus_in_one_poll_is_dropped() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);

    sup.transport_mut().push(&encode(HEADER_FILL, COMMAND_OPEN));
    sup.transport_mut().push(&encode(HEADER_IGNITION, COMMAND_OPEN));
    sup.poll(&mut sink);

    let tx = sup.transport_mut().take_tx();
    assert_eq!(tx.len(), 8);
    assert!(sup.transport().rx.is_empty());
    assert_eq!(sup.stats().surplus_octets, 8);
    // The second request never ran.
    assert_eq!(sup.bank().gpio().level(Pin::O2Valve), Level::Low);
}

// ── Link loss ─────────────────────────────────────────────────

#[test]
fn peer_close_fires_shutdown_exactly_once() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);
    open_everything(&mut sup, &mut sink);

    sup.transport_mut().peer_close();
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    assert_eq!(sink.shutdowns(), 1);
    assert!(sup.valves().all_closed());
    assert!(sup.bank().gpio().all_low());

    // Later polls re-listen without another shutdown.
    for _ in 0..5 {
        sup.poll(&mut sink);
    }
    assert_eq!(sup.phase(), ConnectionPhase::Listening);
    assert_eq!(sink.shutdowns(), 1);
    assert_eq!(sup.stats().emergency_shutdowns, 1);
}

#[test]
fn close_path_goes_through_peer_closing() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);
    sup.transport_mut().peer_close();
    sup.poll(&mut sink);

    let phases: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            (ConnectionPhase::Closed, ConnectionPhase::Listening),
            (ConnectionPhase::Listening, ConnectionPhase::Established),
            (ConnectionPhase::Established, ConnectionPhase::PeerClosing),
            (ConnectionPhase::PeerClosing, ConnectionPhase::Closed),
        ]
    );

    // The shutdown lands between entering PeerClosing and leaving it.
    let shutdown_at = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::EmergencyShutdown { .. }))
        .unwrap();
    let closed_at = sink
        .events
        .iter()
        .position(|e| {
            matches!(
                e,
                AppEvent::PhaseChanged {
                    to: ConnectionPhase::Closed,
                    ..
                }
            )
        })
        .unwrap();
    assert!(shutdown_at < closed_at);
}

#[test]
fn receive_error_is_a_link_loss() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);
    open_everything(&mut sup, &mut sink);

    sup.transport_mut().fail_receive = true;
    sup.transport_mut().push(&encode(HEADER_FILL, COMMAND_STATUS));
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    assert_eq!(sink.shutdowns(), 1);
    assert!(sup.valves().all_closed());
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::TransportError(TransportError::ReceiveFailed)
    )));
}

#[test]
fn short_send_is_a_link_loss() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);

    sup.transport_mut().send_limit = Some(3);
    sup.transport_mut().push(&encode(HEADER_FILL, COMMAND_OPEN));
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    assert_eq!(sink.shutdowns(), 1);
    assert!(sup.valves().all_closed());
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::TransportError(TransportError::ShortSend { sent: 3 })
    )));
}

#[test]
fn abrupt_close_while_established_shuts_down_once() {
    for observed in [
        gse_valve::protocol::transport::SocketState::Closed,
        gse_valve::protocol::transport::SocketState::Listening,
    ] {
        let (mut sup, mut sink) = make_supervisor();
        establish(&mut sup, &mut sink);
        open_everything(&mut sup, &mut sink);

        sup.transport_mut().state = observed;
        assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
        assert_eq!(sink.shutdowns(), 1, "{observed:?}");
        assert!(sup.valves().all_closed());
        assert_eq!(sup.transport().disconnects, 1);
    }
}

#[test]
fn failed_disconnect_retries_and_shuts_down_once() {
    let (mut sup, mut sink) = make_supervisor();
    establish(&mut sup, &mut sink);
    open_everything(&mut sup, &mut sink);

    sup.transport_mut().fail_disconnect = true;
    sup.transport_mut().peer_close();
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::PeerClosing);
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::PeerClosing);
    assert_eq!(sink.shutdowns(), 0);

    sup.transport_mut().fail_disconnect = false;
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    assert_eq!(sink.shutdowns(), 1);
    assert_eq!(sup.transport().disconnects, 3);
    assert!(sup.valves().all_closed());
}

#[test]
fn each_session_gets_its_own_shutdown() {
    let (mut sup, mut sink) = make_supervisor();
    for session in 1..=3 {
        establish(&mut sup, &mut sink);
        request(&mut sup, &mut sink, HEADER_FILL, COMMAND_OPEN);
        sup.transport_mut().peer_close();
        assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
        assert_eq!(sink.shutdowns(), session);
    }
    assert_eq!(sup.stats().link_losses, 3);
    assert_eq!(sup.stats().links_established, 3);
}

#[test]
fn peer_gone_before_first_service_still_shuts_down() {
    let (mut sup, mut sink) = make_supervisor();
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Listening);
    sup.transport_mut().state = gse_valve::protocol::transport::SocketState::PeerClosing;
    assert_eq!(sup.poll(&mut sink), ConnectionPhase::Closed);
    assert_eq!(sink.shutdowns(), 1);
}
