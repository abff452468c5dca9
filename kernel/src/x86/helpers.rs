use core::arch::asm;

use crate::{
    interrupts::defs::InterruptDescriptorTablePointer, memory::defs::GlobalDescriptorTablePointer,
};

// ******** Control Registers ********

#[inline]
pub fn read_cr2() -> u32 {
    let value: u32;
    unsafe {
        asm!("mov {}, cr2", out(reg) value, options(nomem, nostack, preserves_flags));
    }
    value
}

#[inline]
pub fn read_eflags() -> u32 {
    let eflags: u32;
    unsafe {
        asm!("pushfd; pop {}", out(reg) eflags, options(nomem, preserves_flags));
    }
    eflags
}

// ******** Interrupts ********

#[inline]
pub fn lidt(idt: &InterruptDescriptorTablePointer) {
    unsafe {
        asm!("lidt [{}]", in(reg) idt, options(readonly, nostack, preserves_flags));
    }
}

#[inline]
pub fn cli() {
    unsafe {
        asm!("cli", options(nomem, nostack));
    }
}

#[inline]
pub fn sti() {
    unsafe {
        asm!("sti", options(nomem, nostack));
    }
}

#[inline]
pub fn hlt() {
    unsafe {
        asm!("hlt", options(nomem, nostack, preserves_flags));
    }
}

/// Disable interrupts and stop the processor for good.
pub fn halt_forever() -> ! {
    cli();
    loop {
        hlt();
    }
}

// *************** Segmentation ***************

#[inline]
pub unsafe fn lgdt(gdt: &GlobalDescriptorTablePointer) {
    unsafe {
        asm!("lgdt [{}]",
        in(reg) gdt, options(readonly, nostack, preserves_flags));
    }
}

#[inline]
pub fn load_cs(sel: u16) {
    unsafe {
        asm!("pushl {0:e}; \
        pushl $1f; \
        lretl; \
        1:", in(reg) sel as u32, options(att_syntax));
    }
}

/// Reload every data segment register with the same selector.
#[inline]
pub fn load_data_segments(sel: u16) {
    unsafe {
        asm!(
            "mov ds, {0:x}",
            "mov es, {0:x}",
            "mov fs, {0:x}",
            "mov gs, {0:x}",
            "mov ss, {0:x}",
            in(reg) sel,
            options(nostack, preserves_flags)
        );
    }
}

// ************ I/O Ports ************

#[inline]
pub fn outb(port: u16, value: u8) {
    unsafe {
        asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
}

#[inline]
pub fn inb(port: u16) -> u8 {
    let value: u8;
    unsafe {
        asm!(
            "in al, dx",
            out("al") value,
            in("dx") port,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}
