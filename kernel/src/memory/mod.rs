pub mod defs;
pub mod gdt;
