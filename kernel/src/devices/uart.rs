//! UART Serial Communication implementation. COM1 is an external device located at 0x3F8. Communication with it
//! allows us to setup UART configuration and send our first bit of data.
//! More information can be found here https://wiki.osdev.org/UART.

use crate::x86::hardware::Hardware;

use super::{defs::COM1, error::SerialError};

// Register offsets from the base port
const DATA: u16 = 0;
const INTERRUPT_ENABLE: u16 = 1;
const FIFO_CONTROL: u16 = 2;
const LINE_CONTROL: u16 = 3;
const MODEM_CONTROL: u16 = 4;
const LINE_STATUS: u16 = 5;

const LINE_STATUS_TRANSMIT_EMPTY: u8 = 0x20;

/// Attempts to see an empty transmit register before writing anyway
const TRANSMIT_SPIN_LIMIT: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialPort {
    base: u16,
}

impl SerialPort {
    /// Initialize UART and perform its configuration. In case UART is not available, it returns an error.
    pub fn init<H: Hardware>(hw: &mut H, base: u16) -> Result<SerialPort, SerialError> {
        hw.write_byte(base + FIFO_CONTROL, 0x00); // FIFO Control Register
        hw.write_byte(base + LINE_CONTROL, 0x80); // Line Control (Unlock Divisor)
        hw.write_byte(base + DATA, (115200 / 9600) as u8); // Divisor low byte
        hw.write_byte(base + INTERRUPT_ENABLE, 0x00); // Divisor high byte
        hw.write_byte(base + LINE_CONTROL, 0x03); // Line Control (Lock Divisor, 8 data bits)
        hw.write_byte(base + MODEM_CONTROL, 0x00); // Modem Control
        hw.write_byte(base + INTERRUPT_ENABLE, 0x01); // Interrupt Enable

        // If Line Status = 0xFF, no Serial Port is available
        if hw.read_byte(base + LINE_STATUS) == 0xFF {
            return Err(SerialError::PortUnavailable);
        }

        // Clear pending interrupt identification and data
        hw.read_byte(base + FIFO_CONTROL);
        hw.read_byte(base + DATA);

        Ok(SerialPort { base })
    }

    pub fn com1<H: Hardware>(hw: &mut H) -> Result<SerialPort, SerialError> {
        SerialPort::init(hw, COM1)
    }

    /// Puts a byte in the Serial Port. Waits (bounded) for the transmitter to be ready.
    pub fn write_byte<H: Hardware>(&self, hw: &mut H, byte: u8) {
        for _ in 0..TRANSMIT_SPIN_LIMIT {
            if hw.read_byte(self.base + LINE_STATUS) & LINE_STATUS_TRANSMIT_EMPTY != 0 {
                break;
            }
        }

        hw.write_byte(self.base + DATA, byte);
    }

    pub fn write_str<H: Hardware>(&self, hw: &mut H, text: &str) {
        for byte in text.bytes() {
            if byte == b'\n' {
                self.write_byte(hw, b'\r');
            }
            self.write_byte(hw, byte);
        }
    }
}
