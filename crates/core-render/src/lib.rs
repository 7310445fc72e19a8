//! Frame composition.
//!
//! Each frame (rows window, status bar, message bar, final cursor placement)
//! is assembled into one owned byte buffer and handed to the terminal
//! driver for a single write, so the screen never tears between a clear and
//! its repaint. The renderer reads state and emits bytes; it performs no
//! terminal I/O itself.

use core_state::EditorState;

pub mod escape;

const BANNER: &str = concat!("Ceramic editor -- version ", env!("CARGO_PKG_VERSION"));

/// Run the scroll pass, then compose the full frame for the current state.
pub fn refresh_frame(state: &mut EditorState) -> Vec<u8> {
    state.scroll();

    let mut frame = Vec::with_capacity(state.view.screen_rows * state.view.screen_cols + 256);
    frame.extend_from_slice(escape::HIDE_CURSOR);
    frame.extend_from_slice(escape::CURSOR_HOME);

    draw_rows(state, &mut frame);
    draw_status_bar(state, &mut frame);
    draw_message_bar(state, &mut frame);

    let cursor_row = state.cursor.cy - state.view.row_off + 1;
    let cursor_col = state.cursor.rx - state.view.col_off + 1;
    frame.extend_from_slice(&escape::move_to(cursor_row, cursor_col));
    frame.extend_from_slice(escape::SHOW_CURSOR);
    frame
}

/// Bytes that return the terminal to a blank default screen on exit.
pub fn clear_screen_bytes() -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    out.extend_from_slice(escape::CLEAR_SCREEN);
    out.extend_from_slice(escape::CURSOR_HOME);
    out
}

fn draw_rows(state: &EditorState, frame: &mut Vec<u8>) {
    let view = &state.view;
    for screen_row in 0..view.screen_rows {
        let file_row = screen_row + view.row_off;
        if file_row >= state.buffer.num_rows() {
            if state.buffer.num_rows() == 0 && screen_row == view.screen_rows / 3 {
                draw_banner(view.screen_cols, frame);
            } else {
                frame.push(b'~');
            }
        } else {
            let render = state.buffer.rows()[file_row].render();
            let visible = render
                .get(view.col_off..)
                .unwrap_or(&[])
                .iter()
                .take(view.screen_cols);
            frame.extend(visible);
        }
        frame.extend_from_slice(escape::ERASE_LINE);
        frame.extend_from_slice(b"\r\n");
    }
}

fn draw_banner(screen_cols: usize, frame: &mut Vec<u8>) {
    let banner = &BANNER[..BANNER.len().min(screen_cols)];
    let mut padding = (screen_cols - banner.len()) / 2;
    if padding > 0 {
        frame.push(b'~');
        padding -= 1;
    }
    frame.extend(std::iter::repeat(b' ').take(padding));
    frame.extend_from_slice(banner.as_bytes());
}

fn draw_status_bar(state: &EditorState, frame: &mut Vec<u8>) {
    frame.extend_from_slice(escape::REVERSE_VIDEO);

    let name = state
        .buffer
        .file_name()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "[No file]".to_string());
    let name = truncate_str(&name, 20);
    let modified = if state.buffer.is_dirty() {
        "(modified)"
    } else {
        ""
    };
    let left = format!(
        "{name} - {rows} lines {modified}",
        rows = state.buffer.num_rows()
    );
    let right = format!(
        "{current}/{total}",
        current = state.cursor.cy + 1,
        total = state.buffer.num_rows()
    );

    let cols = state.view.screen_cols;
    let mut written = left.len().min(cols);
    frame.extend_from_slice(&left.as_bytes()[..written]);
    while written < cols {
        if cols - written == right.len() {
            frame.extend_from_slice(right.as_bytes());
            break;
        }
        frame.push(b' ');
        written += 1;
    }

    frame.extend_from_slice(escape::RESET_ATTRS);
    frame.extend_from_slice(b"\r\n");
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

fn draw_message_bar(state: &EditorState, frame: &mut Vec<u8>) {
    frame.extend_from_slice(escape::ERASE_LINE);
    if let Some(msg) = state.visible_message() {
        let shown = &msg.as_bytes()[..msg.len().min(state.view.screen_cols)];
        frame.extend_from_slice(shown);
    }
}
