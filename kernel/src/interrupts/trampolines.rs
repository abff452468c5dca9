//! Assembly entry stubs. Each stub normalises the stack so that the Rust
//! handlers always see the same `TrapFrame`: vectors without a CPU error code
//! push a zero in its place, every stub pushes its vector number, and the common
//! tail saves the registers, switches to the kernel data segment and passes a
//! pointer to the frame.

use core::arch::global_asm;

use super::defs::EntryPoint;

global_asm!(
    r#"
.macro ISR_NOERR vector
.global isr\vector
isr\vector:
    push 0
    push \vector
    jmp isr_common
.endm

.macro ISR_ERR vector
.global isr\vector
isr\vector:
    push \vector
    jmp isr_common
.endm

.macro IRQ line, vector
.global irq\line
irq\line:
    push 0
    push \vector
    jmp irq_common
.endm

ISR_NOERR 0
ISR_NOERR 1
ISR_NOERR 3
ISR_NOERR 4
ISR_NOERR 6
ISR_ERR   8
ISR_ERR   13
ISR_ERR   14

IRQ 0, 32
IRQ 1, 33

.macro TRAP_COMMON name, handler
\name:
    pusha
    mov eax, ds
    push eax

    mov ax, 0x10
    mov ds, ax
    mov es, ax
    mov fs, ax
    mov gs, ax

    push esp
    call \handler
    add esp, 4

    pop eax
    mov ds, ax
    mov es, ax
    mov fs, ax
    mov gs, ax

    popa
    add esp, 8
    iretd
.endm

TRAP_COMMON isr_common, exception_handler
TRAP_COMMON irq_common, irq_handler
"#
);

extern "C" {
    fn isr0();
    fn isr1();
    fn isr3();
    fn isr4();
    fn isr6();
    fn isr8();
    fn isr13();
    fn isr14();
    fn irq0();
    fn irq1();
}

/// Every vector that has a trampoline, paired with the trampoline's address
pub fn entry_points() -> [EntryPoint; 10] {
    let stubs: [(u32, unsafe extern "C" fn()); 10] = [
        (0, isr0),
        (1, isr1),
        (3, isr3),
        (4, isr4),
        (6, isr6),
        (8, isr8),
        (13, isr13),
        (14, isr14),
        (32, irq0),
        (33, irq1),
    ];

    stubs.map(|(vector, stub)| EntryPoint {
        vector,
        address: stub as usize as u32,
    })
}
