//! Terminal driver: raw-mode lifecycle, timeout-bounded byte reads, whole
//! frame writes, and window-size discovery.
//!
//! Failures here are the fatal tier of the editor's error model: without raw
//! mode and a known window size the editor cannot run, so [`TerminalError`]
//! propagates out to process exit instead of becoming a status message. The
//! [`TerminalGuard`] restores the terminal on drop even when the caller
//! unwinds.

use anyhow::Result;
use core_input::ByteSource;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{stdout, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("could not toggle raw mode: {0}")]
    RawMode(#[source] std::io::Error),
    #[error("could not determine window size")]
    WindowSize,
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Full driver surface consumed by the editor: one-byte reads with timeout
/// (via [`ByteSource`]), single-write frame output, and size discovery.
pub trait Console: ByteSource {
    /// Write one composed frame in a single flush.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;
    /// Visible window size as `(rows, cols)`.
    fn size(&mut self) -> Result<(u16, u16)>;
}

/// Raw-mode + alternate-screen session for the real terminal.
pub struct RawTerminal {
    entered: bool,
}

/// RAII guard ensuring terminal restoration even if the caller early-returns
/// or panics.
pub struct TerminalGuard<'a> {
    terminal: &'a mut RawTerminal,
}

impl Default for RawTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl RawTerminal {
    pub fn new() -> Self {
        Self { entered: false }
    }

    pub fn enter(&mut self) -> Result<(), TerminalError> {
        if !self.entered {
            enable_raw_mode().map_err(TerminalError::RawMode)?;
            execute!(stdout(), EnterAlternateScreen)?;
            self.entered = true;
        }
        Ok(())
    }

    pub fn leave(&mut self) -> Result<(), TerminalError> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen)?;
            disable_raw_mode().map_err(TerminalError::RawMode)?;
            self.entered = false;
        }
        Ok(())
    }

    /// Enter raw mode and return a guard that leaves on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>, TerminalError> {
        self.enter()?;
        Ok(TerminalGuard { terminal: self })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let _ = self.terminal.leave();
    }
}

/// The real tty. Reads bypass stdlib buffering: a buffered reader would
/// swallow bytes that the poll-based timeout logic still expects to see on
/// the file descriptor.
#[derive(Debug, Default)]
pub struct Tty;

impl Tty {
    pub fn new() -> Self {
        Self
    }

    fn poll_stdin(timeout: Duration) -> Result<bool, TerminalError> {
        let mut fds = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = timeout.as_millis().min(i32::MAX as u128) as i32;
        let rc = unsafe { libc::poll(&mut fds, 1, millis) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                // signal interruption: report "no data", caller retries
                return Ok(false);
            }
            return Err(TerminalError::Io(err));
        }
        Ok(rc > 0)
    }

    fn read_one(&mut self, timeout: Duration) -> Result<Option<u8>, TerminalError> {
        if !Self::poll_stdin(timeout)? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        let n = unsafe { libc::read(libc::STDIN_FILENO, byte.as_mut_ptr().cast(), 1) };
        if n < 0 {
            let err = std::io::Error::last_os_error();
            return match err.kind() {
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock => Ok(None),
                _ => Err(TerminalError::Io(err)),
            };
        }
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(byte[0]))
    }

    /// Fallback size discovery: park the cursor in the far corner and parse
    /// the cursor-position report (`ESC [ rows ; cols R`) it provokes.
    fn size_from_cursor_report(&mut self) -> Result<(u16, u16), TerminalError> {
        let mut out = stdout();
        out.write_all(b"\x1b[999C\x1b[999B")?;
        out.write_all(b"\x1b[6n")?;
        out.flush()?;

        let mut report = Vec::with_capacity(32);
        while report.len() < 32 {
            match self.read_one(Duration::from_millis(100))? {
                Some(b'R') | None => break,
                Some(b) => report.push(b),
            }
        }
        let body = report
            .strip_prefix(b"\x1b[")
            .ok_or(TerminalError::WindowSize)?;
        let text = std::str::from_utf8(body).map_err(|_| TerminalError::WindowSize)?;
        let (rows, cols) = text.split_once(';').ok_or(TerminalError::WindowSize)?;
        let rows = rows.parse().map_err(|_| TerminalError::WindowSize)?;
        let cols = cols.parse().map_err(|_| TerminalError::WindowSize)?;
        tracing::debug!(target: "runtime", rows, cols, "size_from_cursor_report");
        Ok((rows, cols))
    }
}

impl ByteSource for Tty {
    fn read_byte(&mut self, timeout: Duration) -> Result<Option<u8>> {
        Ok(self.read_one(timeout)?)
    }
}

impl Console for Tty {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let mut out = stdout();
        out.write_all(frame)?;
        out.flush()?;
        Ok(())
    }

    fn size(&mut self) -> Result<(u16, u16)> {
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 => Ok((rows, cols)),
            _ => Ok(self.size_from_cursor_report()?),
        }
    }
}
