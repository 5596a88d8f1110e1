// Chunk: docs/chunks/text_storage - Gap buffer text storage engine

//! Integration tests for realistic editing sequences.
//!
//! These tests verify that the gap buffer, the counters and the cursor stay
//! in sync through editing patterns a text widget produces.

use textkit_buffer::{BufferOptions, CharIter, Position, TextBuffer};

/// Character iterator `n` characters from the start.
fn nth_char(buf: &TextBuffer, n: usize) -> CharIter {
    let mut it = buf.char_begin();
    for _ in 0..n {
        it = it.forward(buf).unwrap();
    }
    it
}

/// Moves the cursor back one character and deletes it.
fn backspace(buf: &mut TextBuffer) {
    let prev = buf.cursor_iter().backward(buf).unwrap();
    if prev != buf.cursor_iter() {
        buf.set_cursor_iter(prev).unwrap();
        buf.delete_chars(1);
    }
}

#[test]
fn test_insert_into_empty_buffer() {
    let mut buf = TextBuffer::new();
    buf.insert_string("ab\ncd");
    assert_eq!(buf.char_count(), 5);
    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.cursor_pos(), Position::new(1, 2));
}

#[test]
fn test_delete_past_end_is_not_an_error() {
    let mut buf = TextBuffer::with_text("hello");
    buf.set_cursor_iter(buf.char_begin()).unwrap();
    assert_eq!(buf.delete_chars(10), 5);
    assert_eq!(buf.text(), "");

    let mut buf = TextBuffer::with_text("hello");
    buf.set_cursor_iter(buf.char_end()).unwrap();
    assert_eq!(buf.delete_chars(10), 0);
    assert_eq!(buf.text(), "hello");
}

#[test]
fn test_multibyte_counts() {
    let buf = TextBuffer::with_text("héllo");
    assert_eq!(buf.char_count(), 5);
    assert_eq!(buf.byte_count(), 6);
    assert_eq!(nth_char(&buf, 5), buf.char_end());
}

#[test]
fn test_type_word_then_delete_entirely() {
    let mut buf = TextBuffer::new();

    for ch in "hello".chars() {
        buf.insert_string(ch.to_string());
    }
    assert_eq!(buf.text(), "hello");
    assert_eq!(buf.cursor_pos(), Position::new(0, 5));

    for _ in 0..5 {
        backspace(&mut buf);
    }
    assert!(buf.is_empty());
    assert_eq!(buf.cursor_pos(), Position::new(0, 0));
    assert_eq!(buf.char_count(), 0);
}

#[test]
fn test_type_multiple_lines_and_navigate() {
    let mut buf = TextBuffer::new();
    buf.insert_string("first line\nsecond line\nthird line");
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.cursor_pos(), Position::new(2, 10));

    // "second |line"
    let mut target = buf.line_iter_for(1).char_iter();
    for _ in 0..7 {
        target = target.forward(&buf).unwrap();
    }
    buf.set_cursor_iter(target).unwrap();
    assert_eq!(buf.cursor_pos(), Position::new(1, 7));

    buf.insert_string("awesome ");
    let lines: Vec<String> = buf.lines().collect();
    assert_eq!(lines, ["first line", "second awesome line", "third line"]);
    assert_eq!(buf.cursor_pos(), Position::new(1, 15));
}

#[test]
fn test_split_and_rejoin_lines() {
    let mut buf = TextBuffer::with_text("helloworld");
    buf.set_cursor_iter(nth_char(&buf, 5)).unwrap();
    buf.insert_string("\n");

    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.text(), "hello\nworld");
    assert_eq!(buf.cursor_pos(), Position::new(1, 0));

    backspace(&mut buf);
    assert_eq!(buf.line_count(), 0);
    assert_eq!(buf.text(), "helloworld");
    assert_eq!(buf.cursor_pos(), Position::new(0, 5));
}

#[test]
fn test_rapid_insert_delete_cycles() {
    let mut buf = TextBuffer::new();

    buf.insert_string("teh");
    for _ in 0..3 {
        backspace(&mut buf);
    }
    buf.insert_string("the quikc");
    backspace(&mut buf);
    backspace(&mut buf);
    buf.insert_string("ck brown fox");

    assert_eq!(buf.text(), "the quick brown fox");
    assert_eq!(buf.char_count(), 19);
}

#[test]
fn test_delete_forward_sequence() {
    let mut buf = TextBuffer::with_text("abcdefgh");
    buf.set_cursor_iter(nth_char(&buf, 2)).unwrap();

    buf.delete_chars(1);
    buf.delete_chars(1);
    buf.delete_chars(1);

    assert_eq!(buf.text(), "abfgh");
    assert_eq!(buf.cursor_pos(), Position::new(0, 2));
}

#[test]
fn test_edits_at_both_ends_after_append() {
    let mut buf = TextBuffer::with_text("middle");
    buf.append_string(" end");
    buf.insert_string("start ");
    buf.set_cursor_iter(buf.char_end()).unwrap();
    buf.insert_string("!");
    assert_eq!(buf.text(), "start middle end!");
    assert_eq!(buf.cursor_pos(), Position::new(0, 17));
}

#[test]
fn test_single_line_field_typing() {
    let mut buf = TextBuffer::with_options("", BufferOptions::single_line());
    for ch in "user@example.com".chars() {
        buf.insert_string(ch.to_string());
    }
    assert_eq!(buf.text(), "user@example.com");
    buf.set_cursor_iter(nth_char(&buf, 4)).unwrap();
    buf.delete_chars(1);
    buf.insert_string("+tag@");
    assert_eq!(buf.text(), "user+tag@example.com");
}

#[test]
fn test_gap_size_change_does_not_touch_content() {
    let mut buf = TextBuffer::with_text("abc");
    buf.set_gap_size(1);
    buf.insert_string("0123456789");
    assert_eq!(buf.text(), "0123456789abc");
    assert_eq!(buf.gap_size(), 1);
}

#[test]
fn test_tab_spaces_knob() {
    let mut buf = TextBuffer::with_text("\tx");
    assert_eq!(buf.tab_spaces(), 8);
    buf.set_tab_spaces(4);
    assert_eq!(buf.tab_spaces(), 4);
    assert_eq!(buf.text(), "\tx");
}

#[test]
fn test_malformed_input_degrades_gracefully() {
    let mut buf = TextBuffer::new();
    buf.insert_string([b'o', b'k', 0xC0, 0xAE, 0xFF, 0xE2, 0x82]);
    assert_eq!(buf.text(), "ok.");
    assert_eq!(buf.char_count(), 3);
    assert_eq!(buf.cursor_pos(), Position::new(0, 3));
}

#[test]
fn test_replace_selection_like_a_widget() {
    let mut buf = TextBuffer::with_text("the slow fox");
    buf.set_selection_range(nth_char(&buf, 4)..nth_char(&buf, 8))
        .unwrap();
    assert_eq!(buf.selected_text(), "slow");

    let range = buf.selection_range();
    let count = buf.text_range(range.start, range.end).unwrap().chars().count();
    buf.set_cursor_iter(range.start).unwrap();
    buf.delete_chars(count);
    buf.insert_string("quick");

    assert_eq!(buf.text(), "the quick fox");
    assert!(!buf.has_selection());
}
