//! Saving: the name prompt for unnamed buffers, cancellation, direct saves,
//! and the failure message when the write cannot land.

mod common;

use common::{press, seed, Script};
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn save_prompts_for_a_name_and_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let path_str = path.to_str().unwrap();

    let mut ed = Script::new().ctrl('s').text(path_str).enter().into_editor();
    seed(&mut ed, &["hello", "world"]);
    ed.state_mut().buffer.insert_char(0, 5, b'!');
    press(&mut ed, 1);

    assert_eq!(std::fs::read(&path).unwrap(), b"hello!\nworld\n");
    assert!(!ed.state().buffer.is_dirty());
    assert_eq!(ed.state().buffer.file_name(), Some(Path::new(path_str)));
    let msg = ed.state().visible_message().unwrap_or_default().to_string();
    assert!(msg.contains("bytes written to"), "got {msg:?}");
}

#[test]
fn escape_cancels_the_name_prompt() {
    let mut ed = Script::new().ctrl('s').text("ou").escape().into_editor();
    seed(&mut ed, &["data"]);
    press(&mut ed, 1);

    assert_eq!(ed.state().buffer.file_name(), None);
    assert_eq!(ed.state().visible_message(), Some("Save canceled"));
}

#[test]
fn enter_on_an_empty_prompt_is_ignored() {
    let mut ed = Script::new().ctrl('s').enter().text("x").escape().into_editor();
    seed(&mut ed, &["data"]);
    press(&mut ed, 1);

    // the empty Enter neither accepted nor dismissed; Escape did
    assert_eq!(ed.state().buffer.file_name(), None);
}

#[test]
fn named_buffer_saves_without_prompting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("named.txt");

    let mut ed = Script::new().ctrl('s').into_editor();
    seed(&mut ed, &["one line"]);
    ed.state_mut().buffer.set_file_name(path.clone());
    press(&mut ed, 1);

    assert_eq!(std::fs::read(&path).unwrap(), b"one line\n");
}

#[test]
fn write_failure_surfaces_as_a_message_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("out.txt");

    let mut ed = Script::new().ctrl('s').into_editor();
    seed(&mut ed, &["data"]);
    ed.state_mut().buffer.insert_char(0, 0, b'x');
    ed.state_mut().buffer.set_file_name(path);
    press(&mut ed, 1);

    assert!(ed.state().buffer.is_dirty(), "failed save keeps the buffer dirty");
    let msg = ed.state().visible_message().unwrap_or_default().to_string();
    assert!(msg.contains("Can't save!"), "got {msg:?}");
}
