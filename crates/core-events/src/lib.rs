//! Logical key events shared by the input decoder and the dispatcher.
//!
//! The decoder collapses raw bytes (including multi-byte escape sequences)
//! into exactly one `Key` per call; everything downstream works in terms of
//! this vocabulary and never sees partial sequences.

/// One decoded key press.
///
/// `Char` carries the raw byte as read from the terminal, so control bytes
/// (Ctrl-A..Ctrl-Z) arrive as `Char(0x01..0x1a)` rather than as named
/// variants. `Enter` (0x0d), `Escape` (0x1b) and `Backspace` (0x7f) are
/// split out because dispatch treats them structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(u8),
    Enter,
    Escape,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
}

impl Key {
    /// The key produced by holding Ctrl and pressing `c` (its low 5 bits).
    pub const fn ctrl(c: char) -> Self {
        Key::Char((c as u8) & 0x1f)
    }

    /// True for bytes that insert text: printable ASCII, never control bytes
    /// and never anything above 0x7f.
    pub fn is_printable(&self) -> bool {
        matches!(self, Key::Char(b) if !b.is_ascii_control() && *b < 0x80)
    }
}
