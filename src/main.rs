//! GSE Valve Controller: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  TcpTransport      BoardGpio      LogEventSink   IgnitionUart  │
//! │  (Transport)       (GpioPort)     (EventSink)    (SerialPort)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   Supervisor ── Router ── ValveBank (pure logic)       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Poll loop · Watchdog · IgnitionLink safing                    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use gse_valve::adapters::hardware::BoardGpio;
use gse_valve::adapters::log_sink::LogEventSink;
use gse_valve::adapters::tcp_transport::TcpTransport;
use gse_valve::app::ignition::IgnitionLink;
use gse_valve::app::valves::ValveBank;
use gse_valve::config::GseConfig;
use gse_valve::drivers::hw_init;
use gse_valve::drivers::uart::IgnitionUart;
use gse_valve::drivers::watchdog::Watchdog;
use gse_valve::link::Supervisor;
use gse_valve::pins;

// ── Logging ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    use tracing_subscriber::filter::LevelFilter;

    let level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger init failed: {e}"))
}

// ── Ignition safing ───────────────────────────────────────────

fn safe_igniter(link: &mut IgnitionLink<IgnitionUart>) {
    match link.safe() {
        Ok(ack) if ack.is_success() => info!("Ignition controller: OFF acknowledged"),
        Ok(ack) => warn!("Ignition controller: OFF refused ({:?})", ack),
        Err(e) => error!("Ignition controller: OFF not confirmed: {}", e),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GSE valve controller v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = GseConfig::default();
    config.validate()?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config: encode failed: {}", e),
    }

    // ── 2. Outputs low before anything else ───────────────────
    hw_init::init_valve_outputs(&config.pins)?;
    let bank = ValveBank::new(BoardGpio::new(config.pins));

    // ── 3. Ignition controller link ───────────────────────────
    hw_init::init_ignition_uart(
        pins::IGNITION_UART_NUM,
        pins::IGNITION_UART_TX_GPIO,
        pins::IGNITION_UART_RX_GPIO,
        pins::IGNITION_UART_BAUD,
    )?;
    let mut ignition = IgnitionLink::new(
        IgnitionUart::new(pins::IGNITION_UART_NUM),
        config.ignition_ack_poll_limit,
    );
    info!("Ignition controller on UART{}", ignition.port().port_num());
    safe_igniter(&mut ignition);

    // ── 4. Control link ───────────────────────────────────────
    let transport = TcpTransport::new(config.rx_buffer_size);
    let mut supervisor = Supervisor::new(transport, bank, &config);
    let mut sink = LogEventSink::new();
    supervisor.start(&mut sink);

    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let poll_interval = Duration::from_millis(u64::from(config.poll_interval_ms));
    let mut polls_since_stats: u32 = 0;
    let mut shutdowns_seen = supervisor.stats().emergency_shutdowns;

    info!(
        "System ready. Entering control loop (watchdog {}ms).",
        watchdog.timeout_ms()
    );

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        supervisor.poll(&mut sink);

        if supervisor.stats().emergency_shutdowns != shutdowns_seen {
            shutdowns_seen = supervisor.stats().emergency_shutdowns;
            safe_igniter(&mut ignition);
        }

        if config.stats_interval_polls > 0 {
            polls_since_stats += 1;
            if polls_since_stats >= config.stats_interval_polls {
                polls_since_stats = 0;
                match serde_json::to_string(supervisor.stats()) {
                    Ok(json) => info!("STATS | {}", json),
                    Err(e) => warn!("STATS | encode failed: {}", e),
                }
            }
        }

        watchdog.feed();
        std::thread::sleep(poll_interval);
    }
}
