/// Number of gates in the IDT. Every vector the CPU can deliver has a slot.
pub const NUMBER_GATES: usize = 256;

/// Standard exception vectors (0..31 are reserved by the processor).
/// Complete list can be found here: https://wiki.osdev.org/Exceptions
pub mod vectors {
    pub const DIVIDE_ERROR: u32 = 0;
    pub const DEBUG: u32 = 1;
    pub const NON_MASKABLE_INTERRUPT: u32 = 2;
    pub const BREAKPOINT: u32 = 3;
    pub const OVERFLOW: u32 = 4;
    pub const BOUND_RANGE_EXCEEDED: u32 = 5;
    pub const INVALID_OPCODE: u32 = 6;
    pub const DEVICE_NOT_AVAILABLE: u32 = 7;
    pub const DOUBLE_FAULT: u32 = 8;
    pub const COPROCESSOR_SEGMENT_OVERRUN: u32 = 9;
    pub const INVALID_TSS: u32 = 10;
    pub const SEGMENT_NOT_PRESENT: u32 = 11;
    pub const STACK_SEGMENT_FAULT: u32 = 12;
    pub const GENERAL_PROTECTION_FAULT: u32 = 13;
    pub const PAGE_FAULT: u32 = 14;

    /// First vector after the processor-reserved range. IRQ lines are remapped here.
    pub const IRQ_BASE: u32 = 32;
    pub const IRQ_TIMER: u32 = IRQ_BASE;
    pub const IRQ_KEYBOARD: u32 = IRQ_BASE + 1;
}

/// Names of the classified exceptions, indexed by vector.
pub const EXCEPTION_NAMES: [&str; 15] = [
    "Division By Zero",
    "Debug",
    "Non Maskable Interrupt",
    "Breakpoint",
    "Overflow",
    "Out of Bounds",
    "Invalid Opcode",
    "No Coprocessor",
    "Double Fault",
    "Coprocessor Segment Overrun",
    "Bad TSS",
    "Segment Not Present",
    "Stack Fault",
    "General Protection Fault",
    "Page Fault",
];

pub const UNKNOWN_EXCEPTION: &str = "Unknown Exception";

/// Structure of a pointer to a IDT. Must be passed in this format
/// to a lidt call.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed(2))]
pub struct InterruptDescriptorTablePointer {
    pub limit: u16, // Size in bytes - 1
    pub base: u32,  // Pointer to Starting Address
}

/// One 8-byte gate of the IDT. The all-zero gate is "not present".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Gate {
    pub fn_addr_low: u16,      // Function Address Low (16 bits)
    pub segment_selector: u16, // Segment Selector (16 bits)
    pub reserved: u8,          // Reserved by Processor, always zero (8 bits)
    pub flags: u8,             // Present, DPL and gate kind (8 bits)
    pub fn_addr_high: u16,     // Function Address High (16 bits)
}

#[repr(C)]
pub struct InterruptDescriptorTable {
    pub(super) gates: [Gate; NUMBER_GATES],
}

/// Gate Flags. Those allow fine grain control of how and when should traps/interrupts be issued.
/// You can see more at https://wiki.osdev.org/Interrupt_Descriptor_Table#Gate_Descriptor
pub enum GateFlags {
    TASKGATE = 0b0101,  // 32-bit task gate
    INTGATE = 0b1110,   // 32-bit interrupt gate (clears IF on entry)
    TRAPGATE = 0b1111,  // 32-bit trap gate
    DPL0 = 0b00 << 5,   // Permission Level of 0 (Kernel)
    DPL3 = 0b11 << 5,   // Permission Level of 3 (User)
    PRESENT = 0b1 << 7, // Is it present?
}

/// Attribute byte used for every gate this kernel installs (0x8E).
pub const KERNEL_INTERRUPT_GATE: u8 =
    GateFlags::PRESENT as u8 | GateFlags::DPL0 as u8 | GateFlags::INTGATE as u8;

/// Snapshot pushed by the entry trampolines before they call into Rust. The
/// field order mirrors the push order in reverse: data segment last, pusha block,
/// vector and error code pushed by the stub (or the CPU), then the CPU frame.
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct TrapFrame {
    pub ds: u32,

    // This section is pushed to the stack by x86 instruction "pusha"
    pub edi: u32,
    pub esi: u32,
    pub ebp: u32,
    pub esp: u32,
    pub ebx: u32,
    pub edx: u32,
    pub ecx: u32,
    pub eax: u32,

    // Pushed by the trampoline. Vectors without a CPU error code get a zero.
    pub trap_number: u32,
    pub error_code: u32,

    // Pushed by the processor
    pub eip: u32,
    pub cs: u32,
    pub eflags: u32,

    // Only meaningful when the trap crossed a privilege boundary
    pub user_esp: u32,
    pub ss: u32,
}

/// An entry trampoline and the vector it serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    pub vector: u32,
    pub address: u32,
}
