// Chunk: docs/chunks/editable_entry - Editing widget model over the text storage engine

//! End-to-end tests driving an entry with key events the way a host would.

use textkit_entry::{
    Command, EntryConfig, EntryError, Handled, Key, KeyEvent, Modifiers, Position, TextEntry,
};

fn type_str(entry: &mut TextEntry, text: &str) {
    for ch in text.chars() {
        let event = match ch {
            '\n' => KeyEvent::plain(Key::Return),
            '\t' => KeyEvent::plain(Key::Tab),
            _ => KeyEvent::char(ch),
        };
        entry.handle_key(event).unwrap();
    }
}

fn press(entry: &mut TextEntry, key: Key, times: usize) {
    for _ in 0..times {
        entry.handle_key(KeyEvent::plain(key)).unwrap();
    }
}

/// The first-visible marker must always sit on the start of the line it
/// reports.
fn assert_view_consistent(entry: &TextEntry) {
    let expected = entry.buffer().line_iter_for(entry.first_visible_line());
    assert_eq!(entry.first_visible_iter(), expected);
    let cursor_line = entry.cursor_pos().line;
    assert!(cursor_line >= entry.first_visible_line());
    assert!(cursor_line < entry.first_visible_line() + entry.visible_lines());
}

#[test]
fn test_write_a_short_document() {
    let config = EntryConfig::from_json(r#"{ "visible_lines": 4, "gap_size": 2 }"#).unwrap();
    let mut entry = TextEntry::new(&config);

    type_str(&mut entry, "fn main() {\n\tprintln!(\"hi\");\n}\n");
    assert_eq!(entry.buffer().line_count(), 3);
    assert_eq!(entry.cursor_pos(), Position::new(3, 0));
    assert_view_consistent(&entry);

    // Fix a typo on the middle line.
    press(&mut entry, Key::Up, 2);
    press(&mut entry, Key::End, 1);
    press(&mut entry, Key::Backspace, 1);
    type_str(&mut entry, ";");
    assert_eq!(entry.text(), "fn main() {\n\tprintln!(\"hi\");\n}\n");
    assert_view_consistent(&entry);
}

#[test]
fn test_long_document_keeps_view_on_cursor() {
    let config = EntryConfig {
        visible_lines: 5,
        ..Default::default()
    };
    let mut entry = TextEntry::new(&config);
    for i in 0..50 {
        type_str(&mut entry, &format!("row {}\n", i));
        assert_view_consistent(&entry);
    }
    assert_eq!(entry.first_visible_line(), 46);

    press(&mut entry, Key::PageUp, 3);
    assert_view_consistent(&entry);
    assert_eq!(entry.first_visible_line(), 31);

    // Delete whole rows from the middle of the view.
    press(&mut entry, Key::Home, 1);
    for _ in 0..3 {
        press(&mut entry, Key::Delete, "row 35\n".len());
        assert_view_consistent(&entry);
    }
    assert_eq!(entry.buffer().line_count(), 47);

    entry.execute(Command::MoveToBufferStart).unwrap();
    assert_eq!(entry.first_visible_line(), 0);
    assert_view_consistent(&entry);
    assert_eq!(entry.visible_text().unwrap()[0], "row 0");
}

#[test]
fn test_replace_selection_with_multiline_paste() {
    let mut entry = TextEntry::with_text("placeholder", &EntryConfig::default());
    entry.handle_key(KeyEvent::command(Key::Char('a'))).unwrap();
    for ch in "one\ntwo".chars() {
        let cmd = if ch == '\n' {
            Command::InsertNewline
        } else {
            Command::InsertChar(ch)
        };
        entry.execute(cmd).unwrap();
    }
    assert_eq!(entry.text(), "one\ntwo");
    assert_eq!(entry.cursor_pos(), Position::new(1, 3));
}

#[test]
fn test_single_line_field() {
    let mut entry = TextEntry::new(&EntryConfig::single_line());
    type_str(&mut entry, "user@example.com");
    assert_eq!(
        entry.handle_key(KeyEvent::plain(Key::Return)).unwrap(),
        Handled::No
    );
    assert_eq!(
        entry.handle_key(KeyEvent::plain(Key::Tab)).unwrap(),
        Handled::No
    );
    assert_eq!(
        entry.handle_key(KeyEvent::plain(Key::Down)).unwrap(),
        Handled::No
    );

    let shift_home = KeyEvent::new(
        Key::Home,
        Modifiers {
            shift: true,
            ..Default::default()
        },
    );
    entry.handle_key(shift_home).unwrap();
    assert_eq!(entry.cursor_pos(), Position::new(0, 0));
    assert_eq!(entry.text(), "user@example.com");
    assert_eq!(entry.visible_text().unwrap(), vec!["user@example.com"]);
}

#[test]
fn test_malformed_host_text_is_repaired() {
    let mut entry = TextEntry::new(&EntryConfig::default());
    entry.set_text([b'o', b'k', 0xFF, b'!', 0xC1, 0x81]).unwrap();
    assert_eq!(entry.text(), "ok!A");
    press(&mut entry, Key::End, 1);
    assert_eq!(entry.cursor_pos(), Position::new(0, 4));
}

#[test]
fn test_log_view_appends_without_moving() {
    let config = EntryConfig {
        visible_lines: 3,
        ..Default::default()
    };
    let mut entry = TextEntry::with_text("first", &config);
    for i in 0..10 {
        entry.append_text(format!("\nentry {}", i)).unwrap();
    }
    assert_eq!(entry.cursor_pos(), Position::new(0, 0));
    assert_eq!(entry.first_visible_line(), 0);
    assert_eq!(entry.visible_text().unwrap(), vec!["first", "entry 0", "entry 1"]);

    entry.execute(Command::MoveToBufferEnd).unwrap();
    assert_eq!(entry.first_visible_line(), 8);
    assert_eq!(entry.visible_text().unwrap(), vec!["entry 7", "entry 8", "entry 9"]);
}

#[test]
fn test_config_errors_surface() {
    let err = EntryConfig::from_json(r#"{ "tab_spaces": "wide" }"#).unwrap_err();
    assert!(matches!(err, EntryError::Config(_)));
    assert!(err.to_string().starts_with("invalid entry configuration"));
}
