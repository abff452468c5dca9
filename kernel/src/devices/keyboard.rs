//! Scancode set 1 classification for the keyboard IRQ. Only a handful of
//! make codes get a name; everything else is reported by its raw value.

/// Set on every break (release) code
pub const RELEASE_BIT: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A make code with a known name
    Pressed(&'static str),
    /// A break code, carrying the make code of the key that went up
    Released(u8),
    /// A make code without a name
    Unknown(u8),
}

const KEY_NAMES: [(u8, &str); 9] = [
    (0x1E, "A"),
    (0x30, "B"),
    (0x2E, "C"),
    (0x20, "D"),
    (0x12, "E"),
    (0x02, "1"),
    (0x03, "2"),
    (0x1C, "ENTER"),
    (0x39, "SPACE"),
];

pub fn key_name(scancode: u8) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(code, _)| *code == scancode)
        .map(|(_, name)| *name)
}

pub fn classify(scancode: u8) -> KeyEvent {
    match key_name(scancode) {
        Some(name) => KeyEvent::Pressed(name),
        None if scancode & RELEASE_BIT != 0 => KeyEvent::Released(scancode & !RELEASE_BIT),
        None => KeyEvent::Unknown(scancode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_make_codes() {
        assert_eq!(classify(0x1E), KeyEvent::Pressed("A"));
        assert_eq!(classify(0x1C), KeyEvent::Pressed("ENTER"));
        assert_eq!(classify(0x39), KeyEvent::Pressed("SPACE"));
    }

    #[test]
    fn break_codes_report_the_make_code() {
        assert_eq!(classify(0x9E), KeyEvent::Released(0x1E));
        assert_eq!(classify(0xFF), KeyEvent::Released(0x7F));
    }

    #[test]
    fn other_make_codes_are_unknown() {
        assert_eq!(classify(0x10), KeyEvent::Unknown(0x10));
        assert_eq!(key_name(0x10), None);
    }
}
