//! Line-oriented text buffer: an ordered collection of rows owning all
//! document content.
//!
//! Every structural edit is index-validated with clamping or no-op on
//! out-of-range input rather than panicking, and every edit bumps the dirty
//! counter. The buffer never hands out mutable rows; all mutation goes
//! through the operations here so the per-row rendered form stays a pure
//! function of the raw characters.

use std::path::{Path, PathBuf};

pub mod row;
pub use row::Row;

/// Display cells per tab stop. Tab expansion and the logical/rendered column
/// converters must agree on this constant.
pub const TAB_STOP: usize = 8;

#[derive(Debug, Default, Clone)]
pub struct TextBuffer {
    rows: Vec<Row>,
    dirty: u64,
    file_name: Option<PathBuf>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from already-split lines (trailing newlines stripped by
    /// the caller). The result is clean.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let rows = lines.into_iter().map(|l| Row::new(l.as_ref())).collect();
        Self {
            rows,
            dirty: 0,
            file_name: None,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Logical length of the row at `at`, or 0 when out of range.
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    /// Count of edits since the last save; zero means clean.
    pub fn dirty(&self) -> u64 {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Reset the dirty counter, marking the buffer as saved.
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn set_file_name(&mut self, name: PathBuf) {
        self.file_name = Some(name);
    }

    /// Insert a new row holding `text` at `at`; `at == num_rows` appends.
    /// Past-the-end indices are a no-op.
    pub fn insert_row(&mut self, at: usize, text: &[u8]) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(text));
        self.dirty += 1;
    }

    /// Remove the row at `at`; out-of-range is a no-op.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Insert one character into the row at (`row`, `col`); an out-of-range
    /// column appends to that row.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: u8) {
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        r.insert_char(col, ch);
        self.dirty += 1;
    }

    /// Remove one character from the row at (`row`, `col`); out-of-range is a
    /// no-op and does not dirty the buffer.
    pub fn delete_char(&mut self, row: usize, col: usize) {
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        if r.delete_char(col) {
            self.dirty += 1;
        }
    }

    /// Truncate the row at `row` to `col` characters and insert a new row
    /// below holding the remainder. Newline insertion mid-row reduces to this.
    pub fn split_row_at(&mut self, row: usize, col: usize) {
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        let tail = r.split_off(col);
        self.rows.insert(row + 1, Row::new(&tail));
        self.dirty += 1;
    }

    /// Concatenate the following row's characters onto the end of `row`, then
    /// delete the following row. No-op when `row` has no successor.
    pub fn join_with_next(&mut self, row: usize) {
        if row + 1 >= self.rows.len() {
            return;
        }
        let next = self.rows.remove(row + 1);
        self.rows[row].append(next.chars());
        self.dirty += 1;
    }

    /// Serialize all rows back-to-back, each terminated by a newline.
    pub fn to_text(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for r in &self.rows {
            out.extend_from_slice(r.chars());
            out.push(b'\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(lines.iter().map(|l| l.as_bytes()))
    }

    #[test]
    fn from_lines_is_clean() {
        let b = buf(&["one", "two"]);
        assert_eq!(b.num_rows(), 2);
        assert!(!b.is_dirty());
    }

    #[test]
    fn insert_then_delete_row_restores_shape() {
        let mut b = buf(&["one", "two", "three"]);
        b.insert_row(1, b"inserted");
        assert_eq!(b.num_rows(), 4);
        assert_eq!(b.row(1).unwrap().chars(), b"inserted");
        b.delete_row(1);
        assert_eq!(b.num_rows(), 3);
        assert_eq!(b.row(0).unwrap().chars(), b"one");
        assert_eq!(b.row(1).unwrap().chars(), b"two");
        assert_eq!(b.row(2).unwrap().chars(), b"three");
        assert!(b.is_dirty());
    }

    #[test]
    fn insert_row_past_end_is_noop() {
        let mut b = buf(&["one"]);
        b.insert_row(5, b"x");
        assert_eq!(b.num_rows(), 1);
        assert_eq!(b.dirty(), 0);
    }

    #[test]
    fn append_via_insert_row_at_num_rows() {
        let mut b = buf(&["one"]);
        b.insert_row(1, b"two");
        assert_eq!(b.row(1).unwrap().chars(), b"two");
    }

    #[test]
    fn split_then_join_round_trips() {
        for col in 0..=5 {
            let mut b = buf(&["hello"]);
            b.split_row_at(0, col);
            assert_eq!(b.num_rows(), 2);
            b.join_with_next(0);
            assert_eq!(b.num_rows(), 1);
            assert_eq!(b.row(0).unwrap().chars(), b"hello");
        }
    }

    #[test]
    fn join_without_successor_is_noop() {
        let mut b = buf(&["only"]);
        b.join_with_next(0);
        assert_eq!(b.num_rows(), 1);
        assert_eq!(b.dirty(), 0);
    }

    #[test]
    fn char_edits_track_dirty() {
        let mut b = buf(&["ab"]);
        b.insert_char(0, 1, b'x');
        assert_eq!(b.row(0).unwrap().chars(), b"axb");
        assert_eq!(b.dirty(), 1);
        b.delete_char(0, 0);
        assert_eq!(b.row(0).unwrap().chars(), b"xb");
        assert_eq!(b.dirty(), 2);
        // out-of-range delete: no-op, no dirty bump
        b.delete_char(0, 9);
        b.delete_char(7, 0);
        assert_eq!(b.dirty(), 2);
    }

    #[test]
    fn to_text_terminates_every_row() {
        let b = buf(&["a", "", "c"]);
        assert_eq!(b.to_text(), b"a\n\nc\n");
        assert_eq!(TextBuffer::new().to_text(), b"");
    }

    #[test]
    fn mark_clean_resets_counter() {
        let mut b = buf(&["a"]);
        b.insert_char(0, 0, b'z');
        assert!(b.is_dirty());
        b.mark_clean();
        assert_eq!(b.dirty(), 0);
    }
}
