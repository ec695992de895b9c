//! Integration tests for the `embedded-hal` GPIO adapter.
//!
//! A fake stateful output pin stands in for a HAL driver, including one
//! that fails, to check the valve bank behaves through `HalGpio`.

use std::convert::Infallible;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};

use gse_valve::adapters::hardware::HalGpio;
use gse_valve::app::ports::Pin;
use gse_valve::app::valves::{ValveBank, ValveState};
use gse_valve::protocol::vocab::ReplyCode;

// ── Fake pins ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct FakePin {
    high: bool,
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for FakePin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

#[derive(Debug, Default)]
struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
}

impl StatefulOutputPin for BrokenPin {
    fn is_set_high(&mut self) -> Result<bool, ErrorKind> {
        Err(ErrorKind::Other)
    }

    fn is_set_low(&mut self) -> Result<bool, ErrorKind> {
        Err(ErrorKind::Other)
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn valve_bank_drives_hal_pins() {
    let pins: [FakePin; Pin::COUNT] = Default::default();
    let mut bank = ValveBank::new(HalGpio::new(pins));

    assert_eq!(bank.fill_open(), ReplyCode::Open);
    assert!(bank.gpio().pin(Pin::FillValve).high);
    assert!(bank.gpio().pin(Pin::FillIndicator).high);

    assert_eq!(bank.dump_open(), ReplyCode::Open);
    assert!(!bank.gpio().pin(Pin::FillValve).high);
    assert_eq!(bank.fill_status(), ReplyCode::Closed);

    assert!(bank.emergency_shutdown().all_closed());
    for pin in Pin::ALL {
        assert!(!bank.gpio().pin(pin).high, "{pin:?} left high");
    }
}

#[test]
fn unreadable_pin_reports_open() {
    let pins: [BrokenPin; Pin::COUNT] = Default::default();
    let mut bank = ValveBank::new(HalGpio::new(pins));
    assert_eq!(bank.state(gse_valve::app::valves::Valve::N2OFill), ValveState::Open);
    assert_eq!(bank.fill_status(), ReplyCode::Open);
}
