use bitflags::bitflags;

use crate::x86::defs::PrivilegeLevel;

/// GDT Definitions
pub const NUMBER_DESCRIPTORS: usize = 5;

pub const NULL_SEGMENT: u16 = 0;
pub const KERNEL_CODE_SEGMENT: u16 = 1;
pub const KERNEL_DATA_SEGMENT: u16 = 2;
pub const USER_CODE_SEGMENT: u16 = 3;
pub const USER_DATA_SEGMENT: u16 = 4;

/// Selectors as loaded into segment registers (index << 3, GDT, RPL 0)
pub const KERNEL_CODE_SELECTOR: u16 = KERNEL_CODE_SEGMENT << 3;
pub const KERNEL_DATA_SELECTOR: u16 = KERNEL_DATA_SEGMENT << 3;
pub const USER_CODE_SELECTOR: u16 = USER_CODE_SEGMENT << 3;
pub const USER_DATA_SELECTOR: u16 = USER_DATA_SEGMENT << 3;

/// Base and limit of every flat segment: the whole 4GB address space.
pub const FLAT_BASE: u32 = 0;
pub const FLAT_LIMIT: u32 = 0xFFFF_FFFF;

/// Structure of a pointer to a GDT. Must be passed in this format
/// to a lgdt call.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed(2))]
pub struct GlobalDescriptorTablePointer {
    pub limit: u16, // Size in bytes - 1
    pub base: u32,  // Pointer to Starting Address
}

/// One 8-byte segment descriptor, laid out exactly as the CPU reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C, packed)]
pub struct SegmentDescriptor {
    pub limit_low: u16,  // Limit bits 0..15
    pub base_low: u16,   // Base bits 0..15
    pub base_middle: u8, // Base bits 16..23
    pub access: u8,      // Present, DPL, type
    pub granularity: u8, // Limit bits 16..19 and the flag nibble
    pub base_high: u8,   // Base bits 24..31
}

#[derive(Clone, Copy, Debug)]
pub struct GlobalDescriptorTable {
    pub(super) table: [SegmentDescriptor; NUMBER_DESCRIPTORS],
}

bitflags! {
    /// Access byte of a segment descriptor
    pub struct SegmentAccess: u8 {
        const ACCESSED          = 1 << 0;
        const READ_WRITE        = 1 << 1; // Readable for code, writable for data
        const CONFORMING        = 1 << 2; // Direction bit for data segments
        const EXECUTABLE        = 1 << 3;
        const NORMAL            = 1 << 4; // Code/data rather than a system segment
        const DPL_RING_3        = 3 << 5;
        const PRESENT           = 1 << 7;
    }
}

bitflags! {
    /// Upper nibble of the granularity byte
    pub struct SegmentFlags: u8 {
        const AVAILABLE         = 1 << 4;
        const LONG_MODE         = 1 << 5;
        const DEFAULT_SIZE      = 1 << 6; // 32-bit operands
        const GRANULARITY       = 1 << 7; // Limit counts 4KB blocks

        // Limit bits 16..19 travel in the low nibble
        const LIMIT_16_19       = 0xF;
    }
}

impl SegmentAccess {
    // Present ring 0 code segment, readable and executable (0x9A)
    pub const KERNEL_CODE: Self = Self::from_bits_truncate(
        Self::PRESENT.bits() | Self::NORMAL.bits() | Self::EXECUTABLE.bits() | Self::READ_WRITE.bits(),
    );

    // Present ring 0 data segment, writable (0x92)
    pub const KERNEL_DATA: Self = Self::from_bits_truncate(
        Self::PRESENT.bits() | Self::NORMAL.bits() | Self::READ_WRITE.bits(),
    );

    // Ring 3 counterpart of the kernel code segment (0xFA)
    pub const USER_CODE: Self = Self::from_bits_truncate(
        Self::KERNEL_CODE.bits() | PrivilegeLevel::Ring3.dpl_bits(),
    );

    // Ring 3 counterpart of the kernel data segment (0xF2)
    pub const USER_DATA: Self = Self::from_bits_truncate(
        Self::KERNEL_DATA.bits() | PrivilegeLevel::Ring3.dpl_bits(),
    );
}

impl SegmentFlags {
    // 4KB blocks, 32-bit protected mode
    pub const FLAT_32: Self = Self::from_bits_truncate(
        Self::GRANULARITY.bits() | Self::DEFAULT_SIZE.bits() | Self::LIMIT_16_19.bits(),
    );
}
