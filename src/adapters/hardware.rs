//! Hardware adapters: bridge real output pins to the [`GpioPort`] trait.
//!
//! [`BoardGpio`] drives the six valve/indicator pins through raw ESP-IDF
//! calls set up by [`hw_init`](crate::drivers::hw_init).  On non-espidf
//! targets it keeps an in-memory output latch so the binary runs as a
//! simulator.
//!
//! [`HalGpio`] does the same over any `embedded-hal` 1.0 stateful output
//! pins, for boards whose pins are owned by a HAL driver.

use embedded_hal::digital::{PinState, StatefulOutputPin};
use log::warn;

use crate::app::ports::{GpioPort, Level, Pin};
use crate::config::PinMap;

// ── Board GPIO (raw ESP-IDF / simulated latch) ────────────────

/// The flight-line board's output pins.
pub struct BoardGpio {
    map: PinMap,
    #[cfg(not(target_os = "espidf"))]
    latch: [Level; Pin::COUNT],
}

impl BoardGpio {
    /// Pins must already be configured by
    /// [`init_valve_outputs`](crate::drivers::hw_init::init_valve_outputs).
    pub fn new(map: PinMap) -> Self {
        Self {
            map,
            #[cfg(not(target_os = "espidf"))]
            latch: [Level::Low; Pin::COUNT],
        }
    }
}

#[cfg(target_os = "espidf")]
impl GpioPort for BoardGpio {
    fn set_output(&mut self, pin: Pin, level: Level) {
        crate::drivers::hw_init::gpio_write(pin.gpio(&self.map), level.is_high());
    }

    fn get_input(&mut self, pin: Pin) -> Level {
        crate::drivers::hw_init::gpio_read(pin.gpio(&self.map)).into()
    }
}

#[cfg(not(target_os = "espidf"))]
impl GpioPort for BoardGpio {
    fn set_output(&mut self, pin: Pin, level: Level) {
        log::trace!("gpio(sim) {} <- {:?}", pin.gpio(&self.map), level);
        self.latch[pin.index()] = level;
    }

    fn get_input(&mut self, pin: Pin) -> Level {
        self.latch[pin.index()]
    }
}

// ── embedded-hal pins ─────────────────────────────────────────

/// Six `embedded-hal` pins, indexed by [`Pin`].
pub struct HalGpio<P: StatefulOutputPin> {
    pins: [P; Pin::COUNT],
}

impl<P: StatefulOutputPin> HalGpio<P> {
    /// `pins` in [`Pin::ALL`] order.
    pub fn new(pins: [P; Pin::COUNT]) -> Self {
        Self { pins }
    }

    pub fn pin(&self, pin: Pin) -> &P {
        &self.pins[pin.index()]
    }
}

impl<P: StatefulOutputPin> GpioPort for HalGpio<P> {
    fn set_output(&mut self, pin: Pin, level: Level) {
        let state = PinState::from(level.is_high());
        if let Err(e) = self.pins[pin.index()].set_state(state) {
            warn!("gpio {:?} write failed: {:?}", pin, e);
        }
    }

    fn get_input(&mut self, pin: Pin) -> Level {
        match self.pins[pin.index()].is_set_high() {
            Ok(high) => high.into(),
            Err(e) => {
                // Unknown is reported as open.
                warn!("gpio {:?} read failed: {:?}", pin, e);
                Level::High
            }
        }
    }
}
