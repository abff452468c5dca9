/// Serial port COM1
pub const COM1: u16 = 0x3F8;

/// PS/2 controller data port. Holds the scancode of the last key event.
pub const KEYBOARD_DATA: u16 = 0x60;

/// VGA text mode buffer and CRT controller ports
pub const VGA_BUFFER: usize = 0xB8000;
pub const VGA_CRTC_INDEX: u16 = 0x3D4;
pub const VGA_CRTC_DATA: u16 = 0x3D5;
