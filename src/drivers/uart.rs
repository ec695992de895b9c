//! Ignition controller UART.
//!
//! Implements [`SerialPort`] over an installed ESP-IDF UART driver.  Reads
//! never wait: the ignition link does its own bounded polling.
//!
//! On host targets the port is simulated by an ignition controller that
//! acknowledges every complete command with success.

use crate::app::ports::SerialPort;
#[cfg(not(target_os = "espidf"))]
use crate::app::ignition::{ACK_SUCCESS, COMMAND_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartError {
    /// The driver rejected the call (negative return).
    Driver(i32),
}

pub struct IgnitionUart {
    port: i32,
    #[cfg(not(target_os = "espidf"))]
    sim_written: usize,
    #[cfg(not(target_os = "espidf"))]
    sim_acks: usize,
}

impl IgnitionUart {
    /// Wrap a UART already configured by
    /// [`init_ignition_uart`](super::hw_init::init_ignition_uart).
    pub fn new(port: i32) -> Self {
        Self {
            port,
            #[cfg(not(target_os = "espidf"))]
            sim_written: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_acks: 0,
        }
    }

    pub fn port_num(&self) -> i32 {
        self.port
    }
}

#[cfg(target_os = "espidf")]
impl SerialPort for IgnitionUart {
    type Error = UartError;

    fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        // SAFETY: driver installed in hw_init; `data` outlives the call and
        // the driver copies into its TX path before returning.
        let ret = unsafe {
            esp_idf_svc::sys::uart_write_bytes(self.port, data.as_ptr().cast(), data.len())
        };
        if ret < 0 {
            Err(UartError::Driver(ret))
        } else {
            Ok(ret as usize)
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        // SAFETY: `buf` is valid for `buf.len()` writes; zero tick timeout
        // makes this a non-blocking poll.
        let ret = unsafe {
            esp_idf_svc::sys::uart_read_bytes(
                self.port,
                buf.as_mut_ptr().cast(),
                buf.len() as u32,
                0,
            )
        };
        if ret < 0 {
            Err(UartError::Driver(ret))
        } else {
            Ok(ret as usize)
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl SerialPort for IgnitionUart {
    type Error = UartError;

    fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        self.sim_written += data.len();
        self.sim_acks += self.sim_written / COMMAND_LEN;
        self.sim_written %= COMMAND_LEN;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        if self.sim_acks == 0 || buf.is_empty() {
            return Ok(0);
        }
        self.sim_acks -= 1;
        buf[0] = ACK_SUCCESS;
        Ok(1)
    }
}
