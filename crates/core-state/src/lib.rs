//! Editor state: the text buffer, modal cursor, viewport, and transient
//! status message, owned as one value and passed by reference into every
//! operation.
//!
//! Coordinate model: the cursor lives at logical `(cx, cy)` where `cy` may
//! equal the row count (the append-a-new-row position) and `cx` indexes raw
//! characters. The rendered column `rx` is derived from `cx` through tab
//! expansion and is used only for display and scrolling, never for buffer
//! indexing. Vertical motion additionally carries a sticky rendered column so
//! the cursor holds its visual position across rows with different tab
//! layouts; horizontal motion re-anchors it.

use core_text::TextBuffer;
use std::time::{Duration, Instant};

/// Default lifetime of a status message on screen. Storage is not cleared on
/// expiry, only hidden; the next message overwrites it.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Editing mode. Dispatch matches on this exhaustively; adding a mode is a
/// compile-visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Cursor rests on an existing character (vi-style); keys navigate.
    Normal,
    /// Cursor may sit one past the last character; printable keys insert.
    Insert,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Logical column into the current row's characters.
    pub cx: usize,
    /// Row index; may equal the row count on an empty or fully-scrolled buffer.
    pub cy: usize,
    /// Rendered column, recomputed from `cx` on every scroll pass.
    pub rx: usize,
    /// Rendered column vertical moves aim for.
    pub sticky_rx: usize,
}

/// Scroll offsets plus the visible frame size, in row-index / rendered-column
/// space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub row_off: usize,
    pub col_off: usize,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

impl Viewport {
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            screen_rows,
            screen_cols,
        }
    }
}

/// Transient one-line message with its creation time.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    pub fn new(text: String) -> Self {
        Self {
            text,
            set_at: Instant::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self, ttl: Duration) -> bool {
        !self.text.is_empty() && self.set_at.elapsed() < ttl
    }
}

#[derive(Debug)]
pub struct EditorState {
    pub buffer: TextBuffer,
    pub cursor: Cursor,
    pub view: Viewport,
    pub mode: Mode,
    pub message: Option<StatusMessage>,
    pub message_ttl: Duration,
}

impl EditorState {
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: Cursor::default(),
            view: Viewport::new(screen_rows, screen_cols),
            mode: Mode::Normal,
            message: None,
            message_ttl: MESSAGE_TTL,
        }
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage::new(text.into()));
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// The status message, if one is set and its TTL has not elapsed.
    pub fn visible_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| m.is_visible(self.message_ttl))
            .map(StatusMessage::text)
    }

    /// Logical length of the row under the cursor (0 past the last row).
    pub fn current_row_len(&self) -> usize {
        self.buffer.row_len(self.cursor.cy)
    }

    /// Largest legal `cx` for the current row in the current mode: the
    /// append position in Insert, the last character (or 0 on an empty row)
    /// in Normal.
    pub fn max_cx(&self) -> usize {
        let len = self.current_row_len();
        match self.mode {
            Mode::Insert => len,
            Mode::Normal => len.saturating_sub(1),
        }
    }

    /// Re-establish the mode-dependent column invariant. Must run after
    /// every cursor move, not just horizontal ones: the row under the cursor
    /// may have changed length or identity.
    pub fn clamp_cursor(&mut self) {
        let max = self.max_cx();
        if self.cursor.cx > max {
            self.cursor.cx = max;
        }
    }

    /// Re-anchor the sticky rendered column at the cursor's current position.
    /// Horizontal moves and edits call this; vertical moves must not.
    pub fn sync_sticky_column(&mut self) {
        self.cursor.sticky_rx = self
            .buffer
            .row(self.cursor.cy)
            .map_or(0, |r| r.cx_to_rx(self.cursor.cx));
    }

    /// Recompute `rx` and clamp the scroll offsets so the cursor is inside
    /// the visible window. Runs before every frame.
    pub fn scroll(&mut self) {
        self.cursor.rx = self
            .buffer
            .row(self.cursor.cy)
            .map_or(0, |r| r.cx_to_rx(self.cursor.cx));

        let view = &mut self.view;
        if self.cursor.cy < view.row_off {
            view.row_off = self.cursor.cy;
        }
        if self.cursor.cy >= view.row_off + view.screen_rows {
            view.row_off = self.cursor.cy + 1 - view.screen_rows;
        }
        if self.cursor.rx < view.col_off {
            view.col_off = self.cursor.rx;
        }
        if self.cursor.rx >= view.col_off + view.screen_cols {
            view.col_off = self.cursor.rx + 1 - view.screen_cols;
        }
    }
}
