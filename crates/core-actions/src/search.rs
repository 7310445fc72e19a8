//! Incremental search, layered on the prompt callback.
//!
//! The session persists across prompt keystrokes: typing restarts the scan
//! from the top so the highlight tracks the growing query, while the arrow
//! keys repeat the current query from the last hit in the chosen direction,
//! wrapping at both ends of the buffer. Matching runs over rendered rows, so
//! a query of spaces can land inside an expanded tab; the cursor is then
//! mapped back to the logical column.

use crate::Editor;
use anyhow::Result;
use core_events::Key;
use core_state::EditorState;
use core_terminal::Console;
use tracing::debug;

struct SearchSession {
    /// Row of the most recent hit; `None` means the next scan starts fresh.
    last_match: Option<usize>,
    forward: bool,
}

impl SearchSession {
    fn new() -> Self {
        Self {
            last_match: None,
            forward: true,
        }
    }

    /// React to one prompt keystroke: update direction or reset, then scan.
    fn advance(&mut self, state: &mut EditorState, query: &str, key: Key) {
        match key {
            Key::Enter | Key::Escape => {
                self.last_match = None;
                self.forward = true;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.forward = true,
            Key::ArrowLeft | Key::ArrowUp => self.forward = false,
            _ => {
                // the query changed: scan the whole buffer again, forward
                self.last_match = None;
                self.forward = true;
            }
        }

        let num_rows = state.buffer.num_rows();
        if query.is_empty() || num_rows == 0 {
            return;
        }

        // -1 is the virtual position before row 0, so a fresh forward scan
        // starts at the first row and a fresh backward scan wraps to the last
        let mut current = self.last_match.map_or(-1, |r| r as isize);
        let step: isize = if self.forward { 1 } else { -1 };
        for _ in 0..num_rows {
            current += step;
            if current < 0 {
                current = num_rows as isize - 1;
            } else if current >= num_rows as isize {
                current = 0;
            }

            let row_idx = current as usize;
            let row = &state.buffer.rows()[row_idx];
            if let Some(rx) = find_sub(row.render(), query.as_bytes()) {
                debug!(target: "search", row = row_idx, rx, "match");
                self.last_match = Some(row_idx);
                state.cursor.cy = row_idx;
                state.cursor.cx = row.rx_to_cx(rx);
                state.cursor.sticky_rx = rx;
                // oversized offset makes the next scroll pass pull the match
                // row to the top of the window
                state.view.row_off = num_rows;
                return;
            }
        }
    }
}

fn find_sub(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

impl<C: Console> Editor<C> {
    /// Prompt-driven search. Escape restores the cursor and scroll position
    /// from before the search; Enter leaves the cursor on the final hit.
    pub(crate) fn find(&mut self) -> Result<()> {
        let saved_cursor = self.state.cursor;
        let saved_row_off = self.state.view.row_off;
        let saved_col_off = self.state.view.col_off;

        let mut session = SearchSession::new();
        let query = self.prompt(
            "Search: {} (Use ESC/Arrows/Enter)",
            Some(&mut |state, input, key| session.advance(state, input, key)),
        )?;

        if query.is_none() {
            self.state.cursor = saved_cursor;
            self.state.view.row_off = saved_row_off;
            self.state.view.col_off = saved_col_off;
        }
        Ok(())
    }
}
