//! Shared harness: a scripted console that feeds the editor a fixed byte
//! stream and captures every frame it writes.

#![allow(dead_code)]

use anyhow::{bail, Result};
use core_actions::Editor;
use core_config::Config;
use core_input::ByteSource;
use core_terminal::Console;
use core_text::TextBuffer;
use std::collections::VecDeque;
use std::time::Duration;

/// `Some(b)` yields a byte; `None` simulates a read timeout (used to finish
/// a bare Escape press). An exhausted script is a test bug and errors out
/// instead of blocking the key loop.
pub struct ScriptedConsole {
    script: VecDeque<Option<u8>>,
    pub frames: Vec<Vec<u8>>,
}

impl ByteSource for ScriptedConsole {
    fn read_byte(&mut self, _timeout: Duration) -> Result<Option<u8>> {
        match self.script.pop_front() {
            Some(step) => Ok(step),
            None => bail!("script exhausted"),
        }
    }
}

impl Console for ScriptedConsole {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.frames.push(frame.to_vec());
        Ok(())
    }

    fn size(&mut self) -> Result<(u16, u16)> {
        Ok((24, 80))
    }
}

/// Byte-stream builder for key scripts.
#[derive(Default)]
pub struct Script(Vec<Option<u8>>);

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal bytes, one key each.
    pub fn text(mut self, s: &str) -> Self {
        self.0.extend(s.bytes().map(Some));
        self
    }

    /// A raw multi-byte sequence such as `\x1b[C`.
    pub fn seq(mut self, s: &[u8]) -> Self {
        self.0.extend(s.iter().copied().map(Some));
        self
    }

    /// A bare Escape press: the ESC byte followed by a read timeout.
    pub fn escape(mut self) -> Self {
        self.0.push(Some(0x1b));
        self.0.push(None);
        self
    }

    pub fn ctrl(mut self, c: char) -> Self {
        self.0.push(Some((c as u8) & 0x1f));
        self
    }

    pub fn enter(self) -> Self {
        self.text("\r")
    }

    pub fn into_editor(self) -> Editor<ScriptedConsole> {
        let console = ScriptedConsole {
            script: self.0.into(),
            frames: Vec::new(),
        };
        Editor::new(console, &Config::default()).expect("scripted console has a size")
    }
}

/// Load `lines` into the editor's buffer without marking it dirty.
pub fn seed(editor: &mut Editor<ScriptedConsole>, lines: &[&str]) {
    editor.state_mut().buffer = TextBuffer::from_lines(lines.iter().map(|l| l.as_bytes()));
}

/// Dispatch `n` keypresses, requiring each to continue the loop.
pub fn press(editor: &mut Editor<ScriptedConsole>, n: usize) {
    for i in 0..n {
        let flow = editor.process_keypress().expect("keypress dispatch");
        assert_eq!(flow, core_actions::Flow::Continue, "keypress {i} quit early");
    }
}

/// Buffer contents as one string per row.
pub fn buffer_lines(editor: &Editor<ScriptedConsole>) -> Vec<String> {
    editor
        .state()
        .buffer
        .rows()
        .iter()
        .map(|r| String::from_utf8_lossy(r.chars()).to_string())
        .collect()
}
