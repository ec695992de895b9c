//! One-shot hardware peripheral initialization.
//!
//! Configures the six valve/indicator GPIOs and the ignition UART using
//! raw ESP-IDF sys calls.  Called once from `main()` before the control
//! loop starts.  Host builds skip the register work.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::config::PinMap;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    UartConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartConfigFailed(rc) => write!(f, "UART config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── GPIO Outputs ──────────────────────────────────────────────

/// Configure every valve and indicator pin as an output driven low.
///
/// Pins are set up as input/output so the level register can be read
/// back: the valve state is whatever the latch holds.
#[cfg(target_os = "espidf")]
pub fn init_valve_outputs(map: &PinMap) -> Result<(), HwInitError> {
    for pin in map.all() {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: Called once from main() before the control loop;
        // single-threaded, pin numbers validated by GseConfig::validate().
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: valve + indicator outputs configured low");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_valve_outputs(_map: &PinMap) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): GPIO init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was configured in init_valve_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on a pin configured as
    // input/output; reflects the output latch.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── Ignition UART ─────────────────────────────────────────────

/// UART receive ring size (octets).  Acks are a single octet.
pub const UART_RX_BUFFER: i32 = 256;

/// Install the UART driver for the ignition controller link: 8N1, no flow
/// control.
#[cfg(target_os = "espidf")]
pub fn init_ignition_uart(port: i32, tx: i32, rx: i32, baud: u32) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };

    // SAFETY: Called once from main() before the control loop; the
    // driver owns the port from here on.
    unsafe {
        let ret = uart_param_config(port, &cfg);
        if ret != ESP_OK {
            return Err(HwInitError::UartConfigFailed(ret));
        }
        let ret = uart_set_pin(port, tx, rx, -1, -1);
        if ret != ESP_OK {
            return Err(HwInitError::UartConfigFailed(ret));
        }
        let ret = uart_driver_install(port, UART_RX_BUFFER, 0, 0, core::ptr::null_mut(), 0);
        if ret != ESP_OK {
            return Err(HwInitError::UartConfigFailed(ret));
        }
    }

    info!("hw_init: UART{} configured ({} baud, tx={}, rx={})", port, baud, tx, rx);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_ignition_uart(port: i32, _tx: i32, _rx: i32, baud: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): UART{} init skipped ({} baud)", port, baud);
    Ok(())
}
