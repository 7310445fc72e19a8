//! Escape-sequence input decoding.
//!
//! The decoder pulls bytes one at a time from a [`ByteSource`] and assembles
//! them into logical [`Key`] events. Multi-byte sequences (arrows, Home/End,
//! Page-Up/Down, Delete) arrive as `ESC [ ...` or `ESC O ...`; a fast
//! standalone Escape press and a slow-arriving sequence are distinguishable
//! only by timing, so every continuation read is bounded by
//! [`ESCAPE_TIMEOUT`] and a timeout degrades to a literal Escape. The same
//! fallback covers sequences we do not recognize.

use anyhow::Result;
use core_events::Key;
use std::time::Duration;

/// Bound on each continuation read while assembling an escape sequence. This
/// exists solely to resolve the Escape-vs-sequence race; it is not a tick.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(100);

/// Poll interval while blocked waiting for the next key. Timeouts here are
/// retried transparently; the caller only ever sees a decoded key.
pub const KEY_WAIT: Duration = Duration::from_millis(100);

/// A source yielding at most one byte per call, with a read timeout.
/// `Ok(None)` means the timeout elapsed (or the read was interrupted) with
/// no data; errors are reserved for unrecoverable I/O failures.
pub trait ByteSource {
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>>;
}

/// Block until one logical key event is available.
pub fn next_key<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    let byte = loop {
        if let Some(b) = source.read_byte(KEY_WAIT)? {
            break b;
        }
    };
    let key = match byte {
        0x1b => decode_escape(source)?,
        b'\r' => Key::Enter,
        0x7f => Key::Backspace,
        other => Key::Char(other),
    };
    tracing::trace!(target: "input", ?key, "key_decoded");
    Ok(key)
}

/// Decode the remainder of a sequence after a leading `ESC`. Any timeout or
/// unrecognized byte yields the literal Escape key.
fn decode_escape<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    let Some(first) = source.read_byte(ESCAPE_TIMEOUT)? else {
        return Ok(Key::Escape);
    };
    let Some(second) = source.read_byte(ESCAPE_TIMEOUT)? else {
        return Ok(Key::Escape);
    };
    let key = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => {
            // numeric CSI form: ESC [ <digit> ~
            let Some(terminator) = source.read_byte(ESCAPE_TIMEOUT)? else {
                return Ok(Key::Escape);
            };
            match (digit, terminator) {
                (b'1', b'~') => Key::Home,
                (b'3', b'~') => Key::Delete,
                (b'4', b'~') => Key::End,
                (b'5', b'~') => Key::PageUp,
                (b'6', b'~') => Key::PageDown,
                (b'7', b'~') => Key::Home,
                (b'8', b'~') => Key::End,
                _ => Key::Escape,
            }
        }
        (b'[', b'A') => Key::ArrowUp,
        (b'[', b'B') => Key::ArrowDown,
        (b'[', b'C') => Key::ArrowRight,
        (b'[', b'D') => Key::ArrowLeft,
        (b'[', b'H') => Key::Home,
        (b'[', b'F') => Key::End,
        (b'O', b'H') => Key::Home,
        (b'O', b'F') => Key::End,
        _ => Key::Escape,
    };
    Ok(key)
}
