use core::fmt;

use crate::x86::hardware::Hardware;

use super::{
    error::SerialError,
    uart::SerialPort,
    vga::{Color, VGAText},
};

/// Fans text out to every attached sink. Owns the hardware handle the sinks
/// talk through.
pub struct Console<H: Hardware> {
    hw: H,
    vga: Option<VGAText>,
    serial: Option<SerialPort>,
}

impl<H: Hardware> fmt::Write for Console<H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}

impl<H: Hardware> Console<H> {
    pub const fn new(hw: H) -> Console<H> {
        Console {
            hw,
            vga: None,
            serial: None,
        }
    }

    pub fn attach_vga(&mut self, mut vga: VGAText) {
        vga.init(&mut self.hw);
        self.vga = Some(vga);
    }

    pub fn attach_serial(&mut self) -> Result<(), SerialError> {
        self.serial = Some(SerialPort::com1(&mut self.hw)?);
        Ok(())
    }

    /// Colour for subsequent text. Serial output has no colour.
    pub fn set_color(&mut self, fg: Color, bg: Color) {
        if let Some(vga) = self.vga.as_mut() {
            vga.set_color(fg, bg);
        }
    }

    pub fn write_string(&mut self, text: &str) {
        if let Some(vga) = self.vga.as_mut() {
            vga.write_string(text);
        }
        if let Some(serial) = self.serial {
            serial.write_str(&mut self.hw, text);
        }
    }

    pub fn vga(&self) -> Option<&VGAText> {
        self.vga.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn hardware(&mut self) -> &mut H {
        &mut self.hw
    }
}

#[cfg(target_arch = "x86")]
mod global {
    use lazy_static::lazy_static;
    use spin::Mutex;

    use super::Console;
    use crate::{config::LoggingModes, devices::vga::VGAText, x86::hardware::Cpu};

    lazy_static! {
        pub static ref CONSOLE: Mutex<Console<Cpu>> = Mutex::new(Console::new(Cpu));
    }

    /// Attach the sinks selected at build time. A missing serial port is not fatal:
    /// the kernel keeps whatever sinks did come up.
    pub fn setup_console(modes: LoggingModes) {
        let mut console = CONSOLE.lock();

        if modes.contains(LoggingModes::VGA) {
            console.attach_vga(unsafe { VGAText::at_vga_memory() });
        }

        if modes.contains(LoggingModes::SERIAL) && console.attach_serial().is_err() {
            console.write_string("[WARN ] UART: serial port unavailable\n");
        }
    }
}

#[cfg(target_arch = "x86")]
pub use global::{setup_console, CONSOLE};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        devices::{defs::COM1, vga::leaked_buffer},
        testing::FakeHardware,
    };
    use core::fmt::Write;

    #[test]
    fn text_reaches_every_attached_sink() {
        let mut console = Console::new(FakeHardware::new());
        console.attach_vga(VGAText::new(leaked_buffer()));
        console.hardware().push_input(COM1 + 5, 0x60);
        console.attach_serial().unwrap();
        console.hardware().set_register(COM1 + 5, 0x20);
        console.hardware().writes.clear();

        write!(console, "hi").unwrap();

        let vga = console.vga().unwrap();
        assert_eq!(vga.char_at(0, 0).byte, b'h');
        assert_eq!(vga.char_at(0, 1).byte, b'i');
        assert_eq!(console.hardware().writes_to(COM1), b"hi");
    }

    #[test]
    fn console_without_sinks_swallows_text() {
        let mut console = Console::new(FakeHardware::new());
        write!(console, "nobody listens").unwrap();
        assert!(console.hardware().writes.is_empty());
    }

    #[test]
    fn missing_serial_port_is_reported() {
        let mut console = Console::new(FakeHardware::new());
        console.hardware().push_input(COM1 + 5, 0xFF);
        assert_eq!(console.attach_serial(), Err(SerialError::PortUnavailable));
    }
}
