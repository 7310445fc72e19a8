//! Persistence adapter: load a file into lines, write the serialized buffer
//! back out.
//!
//! Synchronous and minimal by design; these helpers isolate byte-level
//! concerns (line splitting, ending stripping) so the dispatcher deals only
//! in buffer operations and status messages.

use std::path::Path;

/// Read `path` and split it into lines with trailing `\n`/`\r` stripped.
/// A trailing newline does not produce an empty final line.
pub fn load_lines(path: &Path) -> std::io::Result<Vec<Vec<u8>>> {
    let bytes = std::fs::read(path)?;
    let mut lines: Vec<Vec<u8>> = bytes
        .split(|&b| b == b'\n')
        .map(|line| {
            let mut line = line;
            while let Some(rest) = line.strip_suffix(b"\r") {
                line = rest;
            }
            line.to_vec()
        })
        .collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        lines.pop();
    }
    tracing::debug!(
        target: "io",
        path = %path.display(),
        bytes = bytes.len(),
        lines = lines.len(),
        "file_read"
    );
    Ok(lines)
}

/// Write the full serialized buffer to `path`, returning the byte count.
pub fn save_text(path: &Path, text: &[u8]) -> std::io::Result<usize> {
    std::fs::write(path, text)?;
    tracing::debug!(
        target: "io",
        path = %path.display(),
        bytes = text.len(),
        "file_written"
    );
    Ok(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_strips_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, b"one\r\ntwo\nthree").unwrap();
        let lines = load_lines(&path).unwrap();
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
    }

    #[test]
    fn trailing_newline_adds_no_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, b"a\nb\n").unwrap();
        assert_eq!(load_lines(&path).unwrap().len(), 2);
    }

    #[test]
    fn empty_file_has_no_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, b"").unwrap();
        assert!(load_lines(&path).unwrap().is_empty());
    }

    #[test]
    fn interior_blank_lines_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, b"a\n\nc\n").unwrap();
        let lines = load_lines(&path).unwrap();
        assert_eq!(lines, vec![b"a".to_vec(), b"".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn save_reports_byte_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let written = save_text(&path, b"hello\n").unwrap();
        assert_eq!(written, 6);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello\n");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_lines(&dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
