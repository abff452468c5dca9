/// Port I/O and the page-fault address register. Descriptor table loads are
/// not part of this interface, see `x86::helpers`.
pub trait Hardware {
    /// Read one byte from an I/O port.
    fn read_byte(&mut self, port: u16) -> u8;

    /// Write one byte to an I/O port.
    fn write_byte(&mut self, port: u16, value: u8);

    /// Linear address that caused the last page fault (CR2).
    fn fault_address(&self) -> u32;
}

/// The processor we are running on.
#[cfg(target_arch = "x86")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Cpu;

#[cfg(target_arch = "x86")]
impl Hardware for Cpu {
    #[inline]
    fn read_byte(&mut self, port: u16) -> u8 {
        super::helpers::inb(port)
    }

    #[inline]
    fn write_byte(&mut self, port: u16, value: u8) {
        super::helpers::outb(port, value)
    }

    #[inline]
    fn fault_address(&self) -> u32 {
        super::helpers::read_cr2()
    }
}
