/// 8259 PIC Definitions. Two chips in cascade: the master is wired to the CPU,
/// the slave hangs off master line 2.
/// More information can be found here https://wiki.osdev.org/8259_PIC

// I/O ports
pub const MASTER_COMMAND: u16 = 0x20;
pub const MASTER_DATA: u16 = 0x21;
pub const SLAVE_COMMAND: u16 = 0xA0;
pub const SLAVE_DATA: u16 = 0xA1;

// Vector offsets after remapping (IRQ 0-7 -> 32-39, IRQ 8-15 -> 40-47)
pub const MASTER_OFFSET: u8 = 32;
pub const SLAVE_OFFSET: u8 = 40;

/// Lines handled by one chip
pub const LINES_PER_CHIP: u8 = 8;
pub const NUMBER_LINES: u8 = 2 * LINES_PER_CHIP;

/// First vector not reserved for processor exceptions
pub const FIRST_FREE_VECTOR: u8 = 32;

pub const EOI: u8 = 0x20; // End of Interrupt command
pub const MASK_ALL: u8 = 0xFF;

/// Initialization Control Words
pub mod icw {
    pub const ICW1_ICW4: u8 = 0x01; // ICW4 needed
    pub const ICW1_SINGLE: u8 = 0x02; // Single (cascade) mode
    pub const ICW1_INTERVAL4: u8 = 0x04; // Call address interval 4 (8)
    pub const ICW1_LEVEL: u8 = 0x08; // Level triggered (edge) mode
    pub const ICW1_INIT: u8 = 0x10; // Initialization required

    pub const ICW3_MASTER_SLAVE_AT_IRQ2: u8 = 0b0000_0100; // Slave sits on master line 2
    pub const ICW3_SLAVE_IDENTITY: u8 = 0b0000_0010; // Slave cascade identity

    pub const ICW4_8086: u8 = 0x01; // 8086/88 (MCS-80/85) mode
    pub const ICW4_AUTO: u8 = 0x02; // Auto (normal) EOI
}

/// IRQ lines
pub const IRQ_TIMER: u8 = 0;
pub const IRQ_KEYBOARD: u8 = 1;
pub const IRQ_CASCADE: u8 = 2;
pub const IRQ_COM2: u8 = 3;
pub const IRQ_COM1: u8 = 4;
pub const IRQ_LPT2: u8 = 5;
pub const IRQ_FLOPPY: u8 = 6;
pub const IRQ_LPT1: u8 = 7;
pub const IRQ_RTC: u8 = 8;
pub const IRQ_MOUSE: u8 = 12;
pub const IRQ_FPU: u8 = 13;
pub const IRQ_PRIMARY_ATA: u8 = 14;
pub const IRQ_SECONDARY_ATA: u8 = 15;

/// Lines unmasked after initialization. The cascade line must stay open or
/// nothing from the slave reaches the CPU.
pub const ENABLED_LINES: [u8; 3] = [IRQ_TIMER, IRQ_KEYBOARD, IRQ_CASCADE];

/// One physical 8259
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip {
    pub command: u16,
    pub data: u16,
    pub offset: u8,
}

/// The cascaded pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptController {
    pub master: Chip,
    pub slave: Chip,
}

/// Acknowledgements issued by the IRQ path for a single interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EoiPolicy {
    /// One EOI before the line is serviced
    Once,
    /// One EOI before servicing and another one unconditionally afterwards
    Twice,
}
