use core::mem::size_of;

use log::{debug, error, info};
use spin::Once;

use crate::memory::defs::*;
use crate::x86::error::TableError;

static GLOBAL_GDT: Once<GlobalDescriptorTable> = Once::new();

/// Global Descriptor Table is used in the process of segmentation. It is responsible
/// to convert the logical address into a linear address. This kernel uses a flat model:
/// every segment spans the full 4GB and only privilege differs.
/// See more at https://en.wikipedia.org/wiki/Memory_segmentation
impl GlobalDescriptorTable {
    /// Create a new GDT with every slot set to the null descriptor
    pub const fn new() -> GlobalDescriptorTable {
        GlobalDescriptorTable {
            table: [SegmentDescriptor::null(); NUMBER_DESCRIPTORS],
        }
    }

    /// Build the five flat segments: null, kernel code/data, user code/data
    pub fn flat() -> Result<GlobalDescriptorTable, TableError> {
        let mut gdt = GlobalDescriptorTable::new();

        gdt.set_entry(NULL_SEGMENT as usize, 0, 0, SegmentAccess::empty(), SegmentFlags::empty())?;
        debug!(target: "GDT", "Entry 0: Null descriptor");

        gdt.set_entry(
            KERNEL_CODE_SEGMENT as usize,
            FLAT_BASE,
            FLAT_LIMIT,
            SegmentAccess::KERNEL_CODE,
            SegmentFlags::FLAT_32,
        )?;
        debug!(target: "GDT", "Entry 1: Kernel code segment (0x{:02X})", KERNEL_CODE_SELECTOR);

        gdt.set_entry(
            KERNEL_DATA_SEGMENT as usize,
            FLAT_BASE,
            FLAT_LIMIT,
            SegmentAccess::KERNEL_DATA,
            SegmentFlags::FLAT_32,
        )?;
        debug!(target: "GDT", "Entry 2: Kernel data segment (0x{:02X})", KERNEL_DATA_SELECTOR);

        gdt.set_entry(
            USER_CODE_SEGMENT as usize,
            FLAT_BASE,
            FLAT_LIMIT,
            SegmentAccess::USER_CODE,
            SegmentFlags::FLAT_32,
        )?;
        debug!(target: "GDT", "Entry 3: User code segment (0x{:02X})", USER_CODE_SELECTOR);

        gdt.set_entry(
            USER_DATA_SEGMENT as usize,
            FLAT_BASE,
            FLAT_LIMIT,
            SegmentAccess::USER_DATA,
            SegmentFlags::FLAT_32,
        )?;
        debug!(target: "GDT", "Entry 4: User data segment (0x{:02X})", USER_DATA_SELECTOR);

        Ok(gdt)
    }

    /// Write one descriptor. An index past the table is reported and nothing is written.
    pub fn set_entry(
        &mut self,
        index: usize,
        base: u32,
        limit: u32,
        access: SegmentAccess,
        flags: SegmentFlags,
    ) -> Result<(), TableError> {
        if index >= self.table.len() {
            error!(target: "GDT", "Invalid GDT entry number: {}", index);
            return Err(TableError::IndexOutOfRange {
                index,
                len: self.table.len(),
            });
        }

        self.table[index] = SegmentDescriptor::new(base, limit, access, flags);

        debug!(
            target: "GDT",
            "Set entry {}: base=0x{:X}, limit=0x{:X}, access=0x{:X}, gran=0x{:X}",
            index,
            base,
            limit,
            access.bits(),
            flags.bits()
        );

        Ok(())
    }

    /// Descriptor stored at `index`, if the slot exists
    pub fn entry(&self, index: usize) -> Option<&SegmentDescriptor> {
        self.table.get(index)
    }

    /// Raw bytes of the whole table, in the order the CPU reads them
    pub fn as_bytes(&self) -> [u8; NUMBER_DESCRIPTORS * 8] {
        let mut bytes = [0; NUMBER_DESCRIPTORS * 8];
        for (chunk, descriptor) in bytes.chunks_exact_mut(8).zip(self.table.iter()) {
            chunk.copy_from_slice(&descriptor.to_bytes());
        }
        bytes
    }

    /// Return a pointer to the value formatted to fit the GDTR
    pub fn pointer(&self) -> GlobalDescriptorTablePointer {
        GlobalDescriptorTablePointer {
            base: self.table.as_ptr() as usize as u32,
            limit: (self.table.len() * size_of::<SegmentDescriptor>() - 1) as u16,
        }
    }

    /// Refresh GDT (using lgdt) and reload every segment register. The table must
    /// outlive its use by the CPU, hence the static borrow.
    #[cfg(target_arch = "x86")]
    pub fn load(&'static self) {
        use crate::x86::helpers::{lgdt, load_cs, load_data_segments};

        let pointer = self.pointer();
        let (base, size) = (pointer.base, pointer.limit as u32 + 1);
        debug!(target: "GDT", "GDT base address: 0x{:X}", base);
        debug!(target: "GDT", "GDT limit: {} bytes", size);

        info!(target: "GDT", "Loading new GDT...");
        unsafe { lgdt(&pointer) };
        load_cs(KERNEL_CODE_SELECTOR);
        load_data_segments(KERNEL_DATA_SELECTOR);
    }
}

impl SegmentDescriptor {
    pub const fn null() -> SegmentDescriptor {
        SegmentDescriptor {
            limit_low: 0,
            base_low: 0,
            base_middle: 0,
            access: 0,
            granularity: 0,
            base_high: 0,
        }
    }

    /// Split base and limit across their sub-fields. Only the upper nibble of `flags`
    /// is kept; the lower nibble always comes from limit bits 16..19.
    pub const fn new(
        base: u32,
        limit: u32,
        access: SegmentAccess,
        flags: SegmentFlags,
    ) -> SegmentDescriptor {
        SegmentDescriptor {
            limit_low: (limit & 0xFFFF) as u16,
            base_low: (base & 0xFFFF) as u16,
            base_middle: ((base >> 16) & 0xFF) as u8,
            access: access.bits(),
            granularity: ((limit >> 16) & 0x0F) as u8 | (flags.bits() & 0xF0),
            base_high: ((base >> 24) & 0xFF) as u8,
        }
    }

    pub fn is_present(&self) -> bool {
        self.access & SegmentAccess::PRESENT.bits() != 0
    }

    pub fn base(&self) -> u32 {
        self.base_low as u32 | (self.base_middle as u32) << 16 | (self.base_high as u32) << 24
    }

    pub fn limit(&self) -> u32 {
        self.limit_low as u32 | ((self.granularity & 0x0F) as u32) << 16
    }

    pub fn to_bytes(self) -> [u8; 8] {
        let limit_low = self.limit_low.to_le_bytes();
        let base_low = self.base_low.to_le_bytes();
        [
            limit_low[0],
            limit_low[1],
            base_low[0],
            base_low[1],
            self.base_middle,
            self.access,
            self.granularity,
            self.base_high,
        ]
    }
}

/// Build the flat GDT, park it in static storage and activate it. Called once by
/// the boot sequence.
pub(crate) fn setup_gdt() -> Result<&'static GlobalDescriptorTable, TableError> {
    info!(target: "GDT", "Initializing Global Descriptor Table...");

    let table = GlobalDescriptorTable::flat()?;
    let gdt = GLOBAL_GDT.call_once(|| table);

    #[cfg(target_arch = "x86")]
    gdt.load();

    info!(target: "GDT", "GDT loaded successfully! Kernel now using custom segments.");
    Ok(gdt)
}
