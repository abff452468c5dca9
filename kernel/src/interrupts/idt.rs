use core::mem::size_of;

use log::{debug, error, info};
use spin::Once;

use crate::memory::defs::KERNEL_CODE_SELECTOR;
use crate::x86::error::TableError;

use super::defs::*;

static GLOBAL_IDT: Once<InterruptDescriptorTable> = Once::new();

impl Gate {
    // Implementation of an empty gate. Used to initialize gates. Not present.
    #[inline]
    pub const fn empty() -> Self {
        Gate {
            fn_addr_low: 0,
            segment_selector: 0,
            reserved: 0,
            flags: 0,
            fn_addr_high: 0,
        }
    }

    /// Gate pointing at `handler` through `selector`, with the given attribute byte
    #[inline]
    pub const fn new(handler: u32, selector: u16, flags: u8) -> Self {
        Gate {
            fn_addr_low: (handler & 0xFFFF) as u16,
            segment_selector: selector,
            reserved: 0,
            flags,
            fn_addr_high: ((handler >> 16) & 0xFFFF) as u16,
        }
    }

    pub fn handler_addr(&self) -> u32 {
        self.fn_addr_low as u32 | (self.fn_addr_high as u32) << 16
    }

    pub fn is_present(&self) -> bool {
        self.flags & GateFlags::PRESENT as u8 != 0
    }

    pub fn to_bytes(self) -> [u8; 8] {
        let low = self.fn_addr_low.to_le_bytes();
        let selector = self.segment_selector.to_le_bytes();
        let high = self.fn_addr_high.to_le_bytes();
        [low[0], low[1], selector[0], selector[1], self.reserved, self.flags, high[0], high[1]]
    }
}

impl InterruptDescriptorTable {
    /// A table where every vector is not present
    #[inline]
    pub const fn new() -> InterruptDescriptorTable {
        InterruptDescriptorTable {
            gates: [Gate::empty(); NUMBER_GATES],
        }
    }

    /// Zero every gate, then point each entry's vector at its trampoline through
    /// the kernel code segment as a ring 0 interrupt gate.
    pub fn with_entry_points(entries: &[EntryPoint]) -> Result<InterruptDescriptorTable, TableError> {
        let mut idt = InterruptDescriptorTable::new();

        for entry in entries {
            if entry.vector >= vectors::IRQ_BASE {
                debug!(target: "IDT", "Hardware interrupt gate {} -> 0x{:X}", entry.vector, entry.address);
            }
            idt.set_gate(
                entry.vector as usize,
                entry.address,
                KERNEL_CODE_SELECTOR,
                KERNEL_INTERRUPT_GATE,
            )?;
        }

        Ok(idt)
    }

    /// Write one gate. An index past the table is reported and nothing is written.
    pub fn set_gate(&mut self, index: usize, handler: u32, selector: u16, flags: u8) -> Result<(), TableError> {
        if index >= self.gates.len() {
            error!(target: "IDT", "Invalid IDT entry number: {}", index);
            return Err(TableError::IndexOutOfRange {
                index,
                len: self.gates.len(),
            });
        }

        self.gates[index] = Gate::new(handler, selector, flags);
        Ok(())
    }

    /// Gate stored at `index`, if the slot exists
    pub fn gate(&self, index: usize) -> Option<&Gate> {
        self.gates.get(index)
    }

    /// Vectors whose gate is marked present
    pub fn present_vectors(&self) -> impl Iterator<Item = usize> + '_ {
        self.gates
            .iter()
            .enumerate()
            .filter(|(_, gate)| gate.is_present())
            .map(|(vector, _)| vector)
    }

    /// Creates the descriptor pointer for this table. This pointer can only be
    /// safely used if the table is never modified or destroyed while in use.
    pub fn pointer(&self) -> InterruptDescriptorTablePointer {
        InterruptDescriptorTablePointer {
            base: self as *const _ as usize as u32,
            limit: (size_of::<Self>() - 1) as u16,
        }
    }

    // The static borrow ensures our IDT is available whenever the CPU needs it.
    // A non-static reference would cause all sorts of bugs related to free before use.
    #[cfg(target_arch = "x86")]
    #[inline]
    pub fn load(&'static self) {
        crate::x86::helpers::lidt(&self.pointer());
    }
}

/// Build the IDT from the trampolines, park it in static storage and activate it.
/// Called once by the boot sequence.
pub(crate) fn setup_idt(entries: &[EntryPoint]) -> Result<&'static InterruptDescriptorTable, TableError> {
    info!(target: "IDT", "Initializing Interrupt Descriptor Table...");

    let table = InterruptDescriptorTable::with_entry_points(entries)?;
    let idt = GLOBAL_IDT.call_once(|| table);
    debug!(target: "IDT", "{} gates present", idt.present_vectors().count());

    #[cfg(target_arch = "x86")]
    idt.load();

    info!(target: "IDT", "Interrupt Table Initialized");
    Ok(idt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture_logs;

    fn fake_entry_points() -> [EntryPoint; 10] {
        let wired = [0, 1, 3, 4, 6, 8, 13, 14, 32, 33];
        wired.map(|vector| EntryPoint {
            vector,
            address: 0x0010_0000 + vector * 0x10,
        })
    }

    #[test]
    fn gate_and_pointer_layouts_match_the_cpu() {
        assert_eq!(size_of::<Gate>(), 8);
        assert_eq!(size_of::<InterruptDescriptorTablePointer>(), 6);
        assert_eq!(size_of::<InterruptDescriptorTable>(), 256 * 8);
    }

    #[test]
    fn page_fault_gate_reads_back_split_address() {
        let mut idt = InterruptDescriptorTable::new();
        idt.set_gate(14, 0x0010_0000, 0x08, 0x8E).unwrap();

        let gate = idt.gate(14).unwrap();
        assert_eq!(gate.fn_addr_low, 0x0000);
        assert_eq!(gate.segment_selector, 0x0008);
        assert_eq!(gate.reserved, 0x00);
        assert_eq!(gate.flags, 0x8E);
        assert_eq!(gate.fn_addr_high, 0x0010);
        assert_eq!(gate.to_bytes(), [0x00, 0x00, 0x08, 0x00, 0x00, 0x8E, 0x10, 0x00]);
    }

    #[test]
    fn kernel_gate_attribute_is_present_ring0_interrupt_gate() {
        assert_eq!(KERNEL_INTERRUPT_GATE, 0x8E);
    }

    #[test]
    fn only_wired_vectors_are_present() {
        let idt = InterruptDescriptorTable::with_entry_points(&fake_entry_points()).unwrap();

        let present: [usize; 10] = {
            let mut out = [0; 10];
            for (slot, vector) in out.iter_mut().zip(idt.present_vectors()) {
                *slot = vector;
            }
            out
        };
        assert_eq!(present, [0, 1, 3, 4, 6, 8, 13, 14, 32, 33]);
        assert_eq!(idt.present_vectors().count(), 10);

        for entry in fake_entry_points() {
            let gate = idt.gate(entry.vector as usize).unwrap();
            assert_eq!(gate.handler_addr(), entry.address);
            assert_eq!(gate.segment_selector, KERNEL_CODE_SELECTOR);
            assert_eq!(gate.flags, KERNEL_INTERRUPT_GATE);
        }

        assert_eq!(*idt.gate(2).unwrap(), Gate::empty());
        assert_eq!(*idt.gate(255).unwrap(), Gate::empty());
    }

    #[test]
    fn out_of_range_gate_is_rejected_without_writing() {
        let mut idt = InterruptDescriptorTable::with_entry_points(&fake_entry_points()).unwrap();
        let before: [Gate; NUMBER_GATES] = idt.gates;

        let (result, logs) = capture_logs(|| idt.set_gate(NUMBER_GATES, 0xDEAD_BEEF, 0x08, 0x8E));

        assert_eq!(
            result,
            Err(TableError::IndexOutOfRange {
                index: NUMBER_GATES,
                len: NUMBER_GATES
            })
        );
        assert_eq!(idt.gates, before);
        assert!(logs
            .iter()
            .any(|r| r.target == "IDT" && r.message.contains("Invalid IDT entry number: 256")));
    }

    #[test]
    fn entry_point_past_the_table_fails_the_build() {
        let entries = [EntryPoint {
            vector: 300,
            address: 0x1000,
        }];
        let result = capture_logs(|| InterruptDescriptorTable::with_entry_points(&entries).err()).0;
        assert_eq!(result, Some(TableError::IndexOutOfRange { index: 300, len: 256 }));
    }

    #[test]
    fn pointer_limit_is_length_minus_one() {
        let idt = InterruptDescriptorTable::new();
        assert_eq!({ idt.pointer().limit }, 2047);
    }
}
