use log::{debug, error, info};

use crate::x86::hardware::Hardware;

use self::{defs::*, error::ControllerError};

pub mod defs;
pub mod error;

/// The legacy pair remapped right after the processor exception range
pub static PICS: InterruptController = InterruptController::remapped();

impl InterruptController {
    /// Master on vectors 32-39, slave on 40-47
    pub const fn remapped() -> InterruptController {
        InterruptController {
            master: Chip {
                command: MASTER_COMMAND,
                data: MASTER_DATA,
                offset: MASTER_OFFSET,
            },
            slave: Chip {
                command: SLAVE_COMMAND,
                data: SLAVE_DATA,
                offset: SLAVE_OFFSET,
            },
        }
    }

    /// Same ports, custom vector offsets. Both spans must sit above the exception
    /// range and must not share a vector.
    pub fn with_offsets(master: u8, slave: u8) -> Result<InterruptController, ControllerError> {
        for offset in [master, slave] {
            if offset < FIRST_FREE_VECTOR || offset > u8::MAX - (LINES_PER_CHIP - 1) {
                return Err(ControllerError::ReservedOffset(offset));
            }
        }

        if master.abs_diff(slave) < LINES_PER_CHIP {
            return Err(ControllerError::OverlappingOffsets { master, slave });
        }

        let mut pics = InterruptController::remapped();
        pics.master.offset = master;
        pics.slave.offset = slave;
        Ok(pics)
    }

    /// Run the four-word initialization handshake on both chips, then mask every
    /// line except timer, keyboard and cascade. The order of the writes is part
    /// of the protocol.
    pub fn initialize<H: Hardware>(&self, hw: &mut H) -> Result<(), ControllerError> {
        info!(target: "PIC", "Initializing Programmable Interrupt Controller...");

        let (master_mask, slave_mask) = self.masks(hw);
        debug!(
            target: "PIC",
            "Current masks - Master: 0x{:X}, Slave: 0x{:X}",
            master_mask,
            slave_mask
        );

        // ICW1: start initialization, ICW4 will follow
        hw.write_byte(self.master.command, icw::ICW1_INIT | icw::ICW1_ICW4);
        hw.write_byte(self.slave.command, icw::ICW1_INIT | icw::ICW1_ICW4);

        // ICW2: vector offsets
        hw.write_byte(self.master.data, self.master.offset);
        hw.write_byte(self.slave.data, self.slave.offset);

        // ICW3: cascade wiring
        hw.write_byte(self.master.data, icw::ICW3_MASTER_SLAVE_AT_IRQ2);
        hw.write_byte(self.slave.data, icw::ICW3_SLAVE_IDENTITY);

        // ICW4: 8086 mode
        hw.write_byte(self.master.data, icw::ICW4_8086);
        hw.write_byte(self.slave.data, icw::ICW4_8086);

        self.mask_all(hw);

        info!(
            target: "PIC",
            "PIC initialized - IRQs remapped to {}-{}",
            self.master.offset,
            self.slave.offset + LINES_PER_CHIP - 1
        );
        debug!(
            target: "PIC",
            "Master PIC: IRQ 0-7 -> INT {}-{}",
            self.master.offset,
            self.master.offset + LINES_PER_CHIP - 1
        );
        debug!(
            target: "PIC",
            "Slave PIC: IRQ 8-15 -> INT {}-{}",
            self.slave.offset,
            self.slave.offset + LINES_PER_CHIP - 1
        );

        for line in ENABLED_LINES {
            self.clear_mask(hw, line)?;
        }

        info!(target: "PIC", "Enabled IRQ 0 (timer) and IRQ 1 (keyboard)");
        Ok(())
    }

    /// Acknowledge a serviced line. The slave is acknowledged first when it owns
    /// the line; the master is acknowledged for every line.
    pub fn send_end_of_interrupt<H: Hardware>(&self, hw: &mut H, line: u8) {
        if line >= LINES_PER_CHIP {
            hw.write_byte(self.slave.command, EOI);
        }
        hw.write_byte(self.master.command, EOI);
    }

    /// Disable one line without touching the others
    pub fn set_mask<H: Hardware>(&self, hw: &mut H, line: u8) -> Result<(), ControllerError> {
        let (chip, bit) = self.chip_for(line)?;

        let value = hw.read_byte(chip.data) | (1 << bit);
        hw.write_byte(chip.data, value);

        debug!(target: "PIC", "Masked IRQ {}", line);
        Ok(())
    }

    /// Enable one line without touching the others
    pub fn clear_mask<H: Hardware>(&self, hw: &mut H, line: u8) -> Result<(), ControllerError> {
        let (chip, bit) = self.chip_for(line)?;

        let value = hw.read_byte(chip.data) & !(1 << bit);
        hw.write_byte(chip.data, value);

        debug!(target: "PIC", "Unmasked IRQ {}", line);
        Ok(())
    }

    /// Current mask registers (master, slave)
    pub fn masks<H: Hardware>(&self, hw: &mut H) -> (u8, u8) {
        (hw.read_byte(self.master.data), hw.read_byte(self.slave.data))
    }

    /// Mask every line on both chips
    pub fn disable<H: Hardware>(&self, hw: &mut H) {
        info!(target: "PIC", "Disabling PIC...");
        self.mask_all(hw);
    }

    /// IRQ line a vector belongs to, if the controller delivers it
    pub fn line_for_vector(&self, vector: u32) -> Option<u8> {
        [self.master, self.slave]
            .iter()
            .enumerate()
            .find_map(|(index, chip)| {
                let offset = chip.offset as u32;
                (offset..offset + LINES_PER_CHIP as u32)
                    .contains(&vector)
                    .then(|| (vector - offset) as u8 + index as u8 * LINES_PER_CHIP)
            })
    }

    fn mask_all<H: Hardware>(&self, hw: &mut H) {
        hw.write_byte(self.master.data, MASK_ALL);
        hw.write_byte(self.slave.data, MASK_ALL);
    }

    fn chip_for(&self, line: u8) -> Result<(Chip, u8), ControllerError> {
        if line >= NUMBER_LINES {
            error!(target: "PIC", "Invalid IRQ line: {}", line);
            return Err(ControllerError::InvalidLine(line));
        }

        if line < LINES_PER_CHIP {
            Ok((self.master, line))
        } else {
            Ok((self.slave, line - LINES_PER_CHIP))
        }
    }
}
