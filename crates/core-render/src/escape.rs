//! Raw terminal control sequences.
//!
//! These byte strings are part of the editor's wire contract with the
//! terminal and must be emitted verbatim; do not replace them with a
//! higher-level command layer.

pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
pub const ERASE_LINE: &[u8] = b"\x1b[K";
pub const REVERSE_VIDEO: &[u8] = b"\x1b[7m";
pub const RESET_ATTRS: &[u8] = b"\x1b[m";

/// Absolute cursor positioning, 1-indexed.
pub fn move_to(row: usize, col: usize) -> Vec<u8> {
    format!("\x1b[{row};{col}H").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_is_one_indexed_semicolon_separated() {
        assert_eq!(move_to(1, 1), b"\x1b[1;1H");
        assert_eq!(move_to(24, 80), b"\x1b[24;80H");
    }
}
