pub mod defs;
pub mod handlers;
pub mod idt;
pub mod irqs;

#[cfg(target_arch = "x86")]
pub mod trampolines;
