use core::fmt;

use volatile::Volatile;

use crate::x86::hardware::Hardware;

use super::defs::{VGA_BUFFER, VGA_CRTC_DATA, VGA_CRTC_INDEX};

/* ************ Declarations ************ */

pub const VGA_COL_LIMIT: usize = 80;
pub const VGA_ROW_LIMIT: usize = 25;
pub const VGA_CHAR_LIMIT: usize = VGA_COL_LIMIT * VGA_ROW_LIMIT;

/// Printed in place of anything outside printable ASCII
const REPLACEMENT_GLYPH: u8 = 0x04;

// VGA Colors type definitions. 4 bits for background, 4 bits for foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct VGAColor(u8);

// Color Pallete. Facilitates translating VGA text colors troughout the Kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0x0,
    Blue = 0x1,
    Green = 0x2,
    Cyan = 0x3,
    Red = 0x4,
    Magenta = 0x5,
    Brown = 0x6,
    LightGray = 0x7,
    DarkGray = 0x8,
    LightBlue = 0x9,
    LightGreen = 0xA,
    LightCyan = 0xB,
    LightRed = 0xC,
    Pink = 0xD,
    Yellow = 0xE,
    White = 0xF,
}

// Represents a single char in the screen (16 bits long)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct VGAChar {
    pub byte: u8, // ASCII Characters only
    pub color: VGAColor,
}

// Every cell of the screen, row-major
#[repr(transparent)] // Same memory ordering as its single field
pub struct Buffer {
    chars: [Volatile<VGAChar>; VGA_CHAR_LIMIT],
}

pub struct VGAText {
    position: usize,
    color: VGAColor, // Current color of the VGA Writer
    buffer: &'static mut Buffer, // ' tells Rust this reference is valid forever (Valid for VGA)
}

/* ************ Definitions ************ */

impl VGAColor {
    // Packs foreground and background into the attribute byte
    pub const fn new(fg: Color, bg: Color) -> VGAColor {
        VGAColor((bg as u8) << 4 | (fg as u8))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl VGAChar {
    const fn blank(color: VGAColor) -> VGAChar {
        VGAChar { byte: b' ', color }
    }
}

impl fmt::Write for VGAText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s);
        Ok(())
    }
}

impl VGAText {
    pub const DEFAULT_COLOR: VGAColor = VGAColor::new(Color::LightGray, Color::Black);

    pub fn new(buffer: &'static mut Buffer) -> VGAText {
        VGAText {
            position: 0,
            color: Self::DEFAULT_COLOR,
            buffer,
        }
    }

    /// Writer over the memory-mapped text buffer.
    ///
    /// # Safety
    /// Only one writer may exist, and the machine must be in VGA text mode.
    pub unsafe fn at_vga_memory() -> VGAText {
        VGAText::new(&mut *(VGA_BUFFER as *mut Buffer))
    }

    /// Hide the blinking cursor and start from a clean screen
    pub fn init<H: Hardware>(&mut self, hw: &mut H) {
        hw.write_byte(VGA_CRTC_INDEX, 0x0A);
        hw.write_byte(VGA_CRTC_DATA, 0x20);

        self.clear();
    }

    // Set foreground and background color
    pub fn set_color(&mut self, fg: Color, bg: Color) {
        self.color = VGAColor::new(fg, bg);
    }

    pub fn color(&self) -> VGAColor {
        self.color
    }

    // Write a single char to the display. In fact, writes 16 bits (half word) to the
    // VGA buffer. If character is a new line (\n), invokes new line handler
    pub fn write_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => self.new_line(),
            byte => {
                if self.position >= VGA_CHAR_LIMIT {
                    self.scroll();
                }

                let color = self.color;
                self.buffer.chars[self.position].write(VGAChar { byte, color });
                self.position += 1;
            }
        }
    }

    // Writes a full string to the VGA buffer. Anything that is not printable ASCII
    // becomes the diamond glyph.
    pub fn write_string(&mut self, s: &str) {
        for byte in s.bytes() {
            match byte {
                0x20..=0x7e | b'\n' => self.write_byte(byte),
                _ => self.write_byte(REPLACEMENT_GLYPH),
            }
        }
    }

    // Blank every cell with the current color and go back to the top left corner
    pub fn clear(&mut self) {
        let blank = VGAChar::blank(self.color);
        for cell in self.buffer.chars.iter_mut() {
            cell.write(blank);
        }
        self.position = 0;
    }

    pub fn char_at(&self, row: usize, col: usize) -> VGAChar {
        self.buffer.chars[row * VGA_COL_LIMIT + col].read()
    }

    /// (row, column) of the next character
    pub fn cursor(&self) -> (usize, usize) {
        (self.position / VGA_COL_LIMIT, self.position % VGA_COL_LIMIT)
    }

    // Move every row one up and blank the last one
    fn scroll(&mut self) {
        for i in VGA_COL_LIMIT..VGA_CHAR_LIMIT {
            let moved = self.buffer.chars[i].read();
            self.buffer.chars[i - VGA_COL_LIMIT].write(moved);
        }

        let blank = VGAChar::blank(self.color);
        for cell in self.buffer.chars[VGA_CHAR_LIMIT - VGA_COL_LIMIT..].iter_mut() {
            cell.write(blank);
        }

        self.position = self.position.saturating_sub(VGA_COL_LIMIT);
    }

    // New line handler, calculates next line and jump to it
    fn new_line(&mut self) {
        let next_line = self.position / VGA_COL_LIMIT + 1;

        if next_line >= VGA_ROW_LIMIT {
            self.position = next_line * VGA_COL_LIMIT;
            self.scroll();
        } else {
            self.position = next_line * VGA_COL_LIMIT;
        }
    }
}

#[cfg(test)]
pub(crate) fn leaked_buffer() -> &'static mut Buffer {
    use std::boxed::Box;

    let blank = VGAChar {
        byte: 0,
        color: VGAColor(0),
    };
    Box::leak(Box::new(Buffer {
        chars: core::array::from_fn(|_| Volatile::new(blank)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHardware;
    use core::fmt::Write;

    fn row_text(text: &VGAText, row: usize) -> std::string::String {
        (0..VGA_COL_LIMIT)
            .map(|col| text.char_at(row, col).byte as char)
            .collect::<std::string::String>()
            .trim_end()
            .into()
    }

    #[test]
    fn writes_with_current_color() {
        let mut text = VGAText::new(leaked_buffer());
        text.clear();
        text.set_color(Color::Yellow, Color::Black);
        text.write_string("WARN");

        assert_eq!(row_text(&text, 0), "WARN");
        assert_eq!(text.char_at(0, 0).color.bits(), 0x0E);
        assert_eq!(text.cursor(), (0, 4));
    }

    #[test]
    fn newline_moves_to_next_row() {
        let mut text = VGAText::new(leaked_buffer());
        text.clear();
        write!(text, "one\ntwo").unwrap();

        assert_eq!(row_text(&text, 0), "one");
        assert_eq!(row_text(&text, 1), "two");
    }

    #[test]
    fn non_ascii_becomes_replacement_glyph() {
        let mut text = VGAText::new(leaked_buffer());
        text.clear();
        text.write_string("é");

        assert_eq!(text.char_at(0, 0).byte, REPLACEMENT_GLYPH);
        assert_eq!(text.char_at(0, 1).byte, REPLACEMENT_GLYPH);
    }

    #[test]
    fn writing_past_the_last_row_scrolls() {
        let mut text = VGAText::new(leaked_buffer());
        text.clear();
        for row in 0..VGA_ROW_LIMIT {
            write!(text, "line {}\n", row).unwrap();
        }

        assert_eq!(row_text(&text, 0), "line 1");
        assert_eq!(row_text(&text, VGA_ROW_LIMIT - 2), "line 24");
        assert_eq!(row_text(&text, VGA_ROW_LIMIT - 1), "");
        assert_eq!(text.cursor(), (VGA_ROW_LIMIT - 1, 0));
    }

    #[test]
    fn init_hides_cursor_and_clears() {
        let mut hw = FakeHardware::new();
        let mut text = VGAText::new(leaked_buffer());
        text.init(&mut hw);

        assert_eq!(hw.writes, [(VGA_CRTC_INDEX, 0x0A), (VGA_CRTC_DATA, 0x20)]);
        assert_eq!(text.char_at(VGA_ROW_LIMIT - 1, VGA_COL_LIMIT - 1).byte, b' ');
    }
}
