//! A single line of text: raw characters plus a derived rendered form.
//!
//! `chars` is the authoritative content; `render` is recomputed from it after
//! every mutation and is never edited directly. The only difference between
//! the two is tab expansion: each tab becomes one-or-more spaces up to the
//! next multiple of [`TAB_STOP`]. One byte is one display cell otherwise.

use crate::TAB_STOP;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    pub fn new(text: &[u8]) -> Self {
        let mut row = Self {
            chars: text.to_vec(),
            render: Vec::new(),
        };
        row.update_render();
        row
    }

    /// Raw characters (logical columns index into this).
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Tab-expanded display form (rendered columns index into this).
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Logical length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Rendered length in display cells.
    pub fn rlen(&self) -> usize {
        self.render.len()
    }

    /// Insert one character at `at`, shifting the tail right. An out-of-range
    /// index appends.
    pub fn insert_char(&mut self, at: usize, ch: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, ch);
        self.update_render();
    }

    /// Remove the character at `at`, shifting the tail left. Returns whether
    /// anything was removed; out-of-range is a no-op.
    pub fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update_render();
        true
    }

    /// Concatenate `text` onto the end of the row.
    pub fn append(&mut self, text: &[u8]) {
        self.chars.extend_from_slice(text);
        self.update_render();
    }

    /// Truncate the row to `at` characters and return the removed tail.
    /// `at` past the end returns an empty tail.
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update_render();
        tail
    }

    /// Map a logical column to its rendered column. Monotonic non-decreasing
    /// in `cx`; every character contributes one cell plus, for tabs, the
    /// cells needed to reach the next multiple of [`TAB_STOP`].
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &b in self.chars.iter().take(cx) {
            if b == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Inverse of [`cx_to_rx`](Self::cx_to_rx): the smallest logical column
    /// whose cumulative rendered width first exceeds `rx`, or the row length
    /// if none does.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &b) in self.chars.iter().enumerate() {
            if b == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    fn update_render(&mut self) {
        self.render.clear();
        for &b in &self.chars {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
    }
}
