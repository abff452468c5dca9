pub mod console;
pub mod debug;
pub mod defs;
pub mod error;
pub mod keyboard;
pub mod uart;
pub mod vga;
