//! Editor state machine: modal key dispatch, cursor movement, edit
//! operations, prompts, and the control loop.
//!
//! Dispatch is two-stage. A universal command table runs first: quit, save,
//! find, Home/End, paging, and the arrow keys behave the same everywhere.
//! The remaining key is then matched exhaustively against the current
//! [`Mode`]. There is no fallthrough between mode arms.
//!
//! The cursor invariant is re-established after every move, not just horizontal
//! ones: in Insert the column may sit one past the last character (the
//! append position); in Normal it rests on an existing character, or column
//! 0 on an empty row.

use anyhow::{Context, Result};
use core_config::Config;
use core_events::Key;
use core_input::next_key;
use core_render::{clear_screen_bytes, refresh_frame};
use core_state::{EditorState, Mode};
use core_terminal::Console;
use core_text::TextBuffer;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod io_ops;
mod search;

const CTRL_Q: Key = Key::ctrl('q');
const CTRL_S: Key = Key::ctrl('s');
const CTRL_F: Key = Key::ctrl('f');
const CTRL_H: Key = Key::ctrl('h');
const CTRL_L: Key = Key::ctrl('l');

/// Rows below the text area: status bar and message bar.
const RESERVED_ROWS: usize = 2;

/// Whether the control loop should keep running after a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The editor: owned state plus the terminal driver it reads from and
/// renders to. Generic over [`Console`] so tests can drive it from a script.
pub struct Editor<C: Console> {
    state: EditorState,
    console: C,
    quit_confirm: u32,
    quit_pending: u32,
}

impl<C: Console> Editor<C> {
    pub fn new(mut console: C, config: &Config) -> Result<Self> {
        let (rows, cols) = console.size()?;
        let mut state = EditorState::new(
            (rows as usize).saturating_sub(RESERVED_ROWS),
            cols as usize,
        );
        state.message_ttl = config.message_ttl;
        Ok(Self {
            state,
            console,
            quit_confirm: config.quit_confirm,
            quit_pending: config.quit_confirm,
        })
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Associate the buffer with `path` and load it if it exists. A missing
    /// file starts an empty buffer carrying that name, so the first save
    /// creates it; any other I/O failure is a startup error.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        match io_ops::load_lines(path) {
            Ok(lines) => {
                info!(target: "io", path = %path.display(), lines = lines.len(), "file_opened");
                self.state.buffer = TextBuffer::from_lines(lines);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(target: "io", path = %path.display(), "new_file");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("could not open {}", path.display()));
            }
        }
        self.state.buffer.set_file_name(path.to_path_buf());
        Ok(())
    }

    /// Alternate render-then-wait until a quit request is honored. Leaves the
    /// terminal on a blank default screen.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.refresh_screen()?;
            if self.process_keypress()? == Flow::Quit {
                self.console.write_frame(&clear_screen_bytes())?;
                info!(target: "runtime", "quit");
                return Ok(());
            }
        }
    }

    /// Compose one frame from current state and flush it in a single write.
    pub fn refresh_screen(&mut self) -> Result<()> {
        let frame = refresh_frame(&mut self.state);
        self.console.write_frame(&frame)
    }

    /// Block for one key event and dispatch it.
    pub fn process_keypress(&mut self) -> Result<Flow> {
        let key = next_key(&mut self.console)?;
        // drop last cycle's message (quit warning included) before dispatch
        self.state.clear_message();

        match key {
            CTRL_Q => {
                if self.state.buffer.is_dirty() && self.quit_pending > 1 {
                    self.quit_pending -= 1;
                    self.state.set_message(
                        "Warning: File has been modified. \
                         Press Ctrl-Q to exit without saving changes.",
                    );
                    return Ok(Flow::Continue);
                }
                return Ok(Flow::Quit);
            }
            CTRL_S => self.save()?,
            CTRL_F => self.find()?,
            Key::Home => {
                self.state.cursor.cx = 0;
                self.state.sync_sticky_column();
            }
            Key::End => {
                self.state.cursor.cx = self.state.current_row_len();
                self.state.clamp_cursor();
                self.state.sync_sticky_column();
            }
            Key::PageUp | Key::PageDown => self.page_move(key),
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.move_cursor(key);
            }
            other => match self.state.mode {
                Mode::Normal => self.dispatch_normal(other),
                Mode::Insert => self.dispatch_insert(other),
            },
        }

        // any non-quit key re-arms the unsaved-changes guard
        self.quit_pending = self.quit_confirm;
        Ok(Flow::Continue)
    }

    fn dispatch_normal(&mut self, key: Key) {
        match key {
            Key::Char(b'h') => self.move_cursor(Key::ArrowLeft),
            Key::Char(b'j') => self.move_cursor(Key::ArrowDown),
            Key::Char(b'k') => self.move_cursor(Key::ArrowUp),
            Key::Char(b'l') => self.move_cursor(Key::ArrowRight),
            Key::Char(b'i') => {
                debug!(target: "input", "enter_insert_mode");
                self.state.mode = Mode::Insert;
            }
            // Normal mode never mutates text
            _ => {}
        }
    }

    fn dispatch_insert(&mut self, key: Key) {
        match key {
            Key::Enter => self.insert_newline(),
            Key::Backspace | CTRL_H => self.delete_char(),
            Key::Delete => {
                // a virtual right-move lets Delete share the backspace path
                self.move_cursor(Key::ArrowRight);
                self.delete_char();
            }
            Key::Escape | CTRL_L => {
                debug!(target: "input", "leave_insert_mode");
                self.state.mode = Mode::Normal;
                self.state.clamp_cursor();
                self.state.sync_sticky_column();
            }
            Key::Char(b) if key.is_printable() => self.insert_char(b),
            _ => {}
        }
    }

    /// One-step cursor move. Horizontal moves re-anchor the sticky rendered
    /// column; vertical moves aim for it through `rx_to_cx`, so the cursor
    /// holds its visual column across rows with different tab layouts.
    fn move_cursor(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => {
                if self.state.cursor.cx > 0 {
                    self.state.cursor.cx -= 1;
                } else if self.state.cursor.cy > 0 {
                    self.state.cursor.cy -= 1;
                    self.state.cursor.cx = self.state.current_row_len();
                }
                self.state.clamp_cursor();
                self.state.sync_sticky_column();
            }
            Key::ArrowRight => {
                let len = self.state.current_row_len();
                let on_row = self.state.cursor.cy < self.state.buffer.num_rows();
                if on_row && self.state.cursor.cx < len {
                    self.state.cursor.cx += 1;
                } else if on_row && self.state.cursor.cx == len {
                    self.state.cursor.cy += 1;
                    self.state.cursor.cx = 0;
                }
                self.state.clamp_cursor();
                self.state.sync_sticky_column();
            }
            Key::ArrowUp => {
                if self.state.cursor.cy > 0 {
                    self.state.cursor.cy -= 1;
                    self.seek_sticky_column();
                }
                self.state.clamp_cursor();
            }
            Key::ArrowDown => {
                if self.state.cursor.cy < self.state.buffer.num_rows() {
                    self.state.cursor.cy += 1;
                    self.seek_sticky_column();
                }
                self.state.clamp_cursor();
            }
            _ => {}
        }
    }

    fn seek_sticky_column(&mut self) {
        let target = self.state.cursor.sticky_rx;
        self.state.cursor.cx = self
            .state
            .buffer
            .row(self.state.cursor.cy)
            .map_or(0, |r| r.rx_to_cx(target));
    }

    /// Page moves are universal commands: snap to the viewport edge, then
    /// take `screen_rows` single-row steps. The mode is never consulted.
    fn page_move(&mut self, key: Key) {
        let view = self.state.view;
        let step = match key {
            Key::PageUp => {
                self.state.cursor.cy = view.row_off;
                Key::ArrowUp
            }
            Key::PageDown => {
                let bottom = view.row_off + view.screen_rows.saturating_sub(1);
                self.state.cursor.cy = bottom.min(self.state.buffer.num_rows());
                Key::ArrowDown
            }
            _ => return,
        };
        for _ in 0..view.screen_rows {
            self.move_cursor(step);
        }
    }

    fn insert_char(&mut self, ch: u8) {
        if self.state.cursor.cy == self.state.buffer.num_rows() {
            let end = self.state.buffer.num_rows();
            self.state.buffer.insert_row(end, b"");
        }
        self.state
            .buffer
            .insert_char(self.state.cursor.cy, self.state.cursor.cx, ch);
        self.state.cursor.cx += 1;
        self.state.sync_sticky_column();
    }

    fn insert_newline(&mut self) {
        let (cx, cy) = (self.state.cursor.cx, self.state.cursor.cy);
        if cx == 0 {
            self.state.buffer.insert_row(cy, b"");
        } else {
            self.state.buffer.split_row_at(cy, cx);
        }
        self.state.cursor.cy += 1;
        self.state.cursor.cx = 0;
        self.state.sync_sticky_column();
    }

    /// Remove the character before the cursor, joining with the previous row
    /// at column 0. Backspace semantics; Delete reaches here after a virtual
    /// right-move.
    fn delete_char(&mut self) {
        let (cx, cy) = (self.state.cursor.cx, self.state.cursor.cy);
        if cy == self.state.buffer.num_rows() || (cx == 0 && cy == 0) {
            return;
        }
        if cx > 0 {
            self.state.buffer.delete_char(cy, cx - 1);
            self.state.cursor.cx -= 1;
        } else {
            let prev_len = self.state.buffer.row_len(cy - 1);
            self.state.buffer.join_with_next(cy - 1);
            self.state.cursor.cy -= 1;
            self.state.cursor.cx = prev_len;
        }
        self.state.sync_sticky_column();
    }

    fn save(&mut self) -> Result<()> {
        if self.state.buffer.file_name().is_none() {
            match self.prompt("Save as: {}", None)? {
                Some(name) => self.state.buffer.set_file_name(PathBuf::from(name)),
                None => {
                    self.state.set_message("Save canceled");
                    return Ok(());
                }
            }
        }
        let Some(path) = self.state.buffer.file_name().map(Path::to_path_buf) else {
            return Ok(());
        };
        let text = self.state.buffer.to_text();
        match io_ops::save_text(&path, &text) {
            Ok(written) => {
                self.state.buffer.mark_clean();
                let name = path.display().to_string();
                let shown = truncate_str(&name, 20);
                self.state
                    .set_message(format!("{written} bytes written to {shown}"));
            }
            Err(e) => {
                self.state
                    .set_message(format!("Can't save! I/O Error: {e}"));
            }
        }
        Ok(())
    }

    /// Single-line modal input on the message bar. The callback, when given,
    /// runs after every keystroke (including the completing Enter and the
    /// cancelling Escape) with the input so far and the key just pressed.
    /// Enter accepts only non-empty input; Escape returns `None`.
    fn prompt(
        &mut self,
        template: &str,
        mut callback: Option<&mut dyn FnMut(&mut EditorState, &str, Key)>,
    ) -> Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.state.set_message(template.replace("{}", &input));
            self.refresh_screen()?;
            let key = next_key(&mut self.console)?;
            match key {
                Key::Backspace | Key::Delete | CTRL_H => {
                    input.pop();
                }
                Key::Escape => {
                    self.state.clear_message();
                    if let Some(cb) = callback.as_mut() {
                        cb(&mut self.state, &input, key);
                    }
                    return Ok(None);
                }
                Key::Enter if !input.is_empty() => {
                    self.state.clear_message();
                    if let Some(cb) = callback.as_mut() {
                        cb(&mut self.state, &input, key);
                    }
                    return Ok(Some(input));
                }
                Key::Char(b) if key.is_printable() => input.push(b as char),
                _ => {}
            }
            if let Some(cb) = callback.as_mut() {
                cb(&mut self.state, &input, key);
            }
        }
    }
}

/// Cut `s` to at most `max` bytes without splitting a UTF-8 sequence.
fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
