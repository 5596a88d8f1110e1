// Chunk: docs/chunks/editable_entry - Editing widget model over the text storage engine
//!
//! The editable text entry.
//!
//! A [`TextEntry`] is the single owner of a [`TextBuffer`]. It turns key
//! events into buffer operations and keeps the state a host needs for
//! drawing: which line is at the top of the view, and which visual column
//! vertical movement is aiming for.
//!
//! The top-of-view marker is a [`LineIter`], so it goes stale on every
//! content mutation. Each mutation is therefore bracketed: the cursor is
//! captured immediately before it, and afterwards the marker is revalidated
//! against that anchor. Cursor moves leave iterators valid and need no
//! bracketing.

use std::borrow::Cow;

use textkit_buffer::{CharIter, LineIter, Position, TextBuffer};
use unicode_width::UnicodeWidthChar;

use crate::command::{resolve_command, Command};
use crate::config::EntryConfig;
use crate::error::EntryError;
use crate::input::KeyEvent;

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The event was consumed by the entry
    Yes,
    /// The event was not handled (should propagate or be ignored)
    No,
}

/// Where a mutation changed the buffer, for marker bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditSite {
    Cursor,
    Append,
    Reset,
}

/// Visual column reached after drawing `ch` starting at `col`.
///
/// Tabs advance to the next multiple of `tab_spaces`; other characters take
/// their terminal cell width (zero for combining marks and controls).
pub fn advance_column(col: usize, ch: char, tab_spaces: usize) -> usize {
    if ch == '\t' {
        let tab = tab_spaces.max(1);
        (col / tab + 1) * tab
    } else {
        col + ch.width().unwrap_or(0)
    }
}

/// Removes line breaks from input destined for a single-line entry.
///
/// `\n` and `\r` never occur inside a multi-byte UTF-8 sequence, so this is
/// safe on raw bytes.
fn strip_line_breaks(text: &[u8]) -> Cow<'_, [u8]> {
    if text.iter().any(|&b| b == b'\n' || b == b'\r') {
        log::debug!("removing line breaks from single-line input");
        Cow::Owned(
            text.iter()
                .copied()
                .filter(|&b| b != b'\n' && b != b'\r')
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// An editable text field over a [`TextBuffer`].
#[derive(Debug)]
pub struct TextEntry {
    buffer: TextBuffer,
    multiline: bool,
    visible_lines: usize,
    /// Start of the first visible line.
    first_visible: LineIter,
    /// Line number of `first_visible`.
    first_visible_line: usize,
    /// Visual column that consecutive vertical moves aim for.
    saved_column: Option<usize>,
}

impl TextEntry {
    /// Creates an empty entry.
    pub fn new(config: &EntryConfig) -> Self {
        Self::with_text("", config)
    }

    /// Creates an entry holding `text`, cursor at the start.
    pub fn with_text(text: impl AsRef<[u8]>, config: &EntryConfig) -> Self {
        let text = if config.multiline {
            Cow::Borrowed(text.as_ref())
        } else {
            strip_line_breaks(text.as_ref())
        };
        let buffer = TextBuffer::with_options(text, config.buffer_options());
        let first_visible = buffer.line_begin();
        Self {
            buffer,
            multiline: config.multiline,
            visible_lines: config.effective_visible_lines(),
            first_visible,
            first_visible_line: 0,
            saved_column: None,
        }
    }

    // ==================== Accessors ====================

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn cursor_pos(&self) -> Position {
        self.buffer.cursor_pos()
    }

    /// Line number shown at the top of the view.
    pub fn first_visible_line(&self) -> usize {
        self.first_visible_line
    }

    /// Start of the line shown at the top of the view.
    pub fn first_visible_iter(&self) -> LineIter {
        self.first_visible
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    /// Changes the view height; the view scrolls if the cursor falls out of it.
    pub fn set_visible_lines(&mut self, lines: usize) -> Result<(), EntryError> {
        self.visible_lines = if self.multiline { lines.max(1) } else { 1 };
        self.ensure_cursor_visible()?;
        Ok(())
    }

    /// Column vertical movement is currently aiming for, if a vertical move
    /// is in progress.
    pub fn saved_column(&self) -> Option<usize> {
        self.saved_column
    }

    /// Visual column of the cursor with tabs expanded.
    pub fn cursor_visual_column(&self) -> Result<usize, EntryError> {
        let cursor = self.buffer.cursor_iter();
        let mut it = self.buffer.line_iter_at(cursor)?.char_iter();
        let mut col = 0;
        while it.offset() < cursor.offset() {
            if let Some(ch) = it.get(&self.buffer)? {
                col = advance_column(col, ch, self.buffer.tab_spaces());
            }
            it = it.forward(&self.buffer)?;
        }
        Ok(col)
    }

    /// Text of the lines currently in view, without their line breaks.
    pub fn visible_text(&self) -> Result<Vec<String>, EntryError> {
        let buf = &self.buffer;
        let mut lines = Vec::with_capacity(self.visible_lines);
        let mut line = self.first_visible;
        let mut number = self.first_visible_line;

        while lines.len() < self.visible_lines && number <= buf.line_count() {
            let next = line.forward(buf)?;
            let mut text = buf.text_range(line.char_iter(), next.char_iter())?;
            if text.ends_with('\n') {
                text.pop();
            }
            lines.push(text);
            line = next;
            number += 1;
        }
        Ok(lines)
    }

    // ==================== Host operations ====================

    /// Replaces the content. The cursor and the view return to the start.
    pub fn set_text(&mut self, text: impl AsRef<[u8]>) -> Result<(), EntryError> {
        let text = if self.multiline {
            Cow::Borrowed(text.as_ref())
        } else {
            strip_line_breaks(text.as_ref())
        };
        self.mutate(EditSite::Reset, |buf| buf.set_text(text))?;
        self.saved_column = None;
        Ok(())
    }

    /// Appends text after the existing content without moving the cursor
    /// or the view.
    pub fn append_text(&mut self, text: impl AsRef<[u8]>) -> Result<(), EntryError> {
        let text = if self.multiline {
            Cow::Borrowed(text.as_ref())
        } else {
            strip_line_breaks(text.as_ref())
        };
        self.mutate(EditSite::Append, |buf| buf.append_string(text))
    }

    /// Scrolls so that `line` is at the top of the view, clamped to the
    /// last line. Returns true if the view moved.
    ///
    /// The marker walks line by line from where it is, so the cost follows
    /// the scroll distance.
    pub fn scroll_to_line(&mut self, line: usize) -> Result<bool, EntryError> {
        let target = line.min(self.buffer.line_count());
        if target == self.first_visible_line {
            return Ok(false);
        }

        let mut marker = self.first_visible;
        let mut number = self.first_visible_line;
        while number < target {
            marker = marker.forward(&self.buffer)?;
            number += 1;
        }
        while number > target {
            marker = marker.backward(&self.buffer)?;
            number -= 1;
        }

        log::trace!("scrolled from line {} to {}", self.first_visible_line, number);
        self.first_visible = marker;
        self.first_visible_line = number;
        Ok(true)
    }

    // ==================== Event handling ====================

    /// Resolves and executes a key event.
    pub fn handle_key(&mut self, event: KeyEvent) -> Result<Handled, EntryError> {
        match resolve_command(&event, self.multiline) {
            Some(cmd) => {
                self.execute(cmd)?;
                Ok(Handled::Yes)
            }
            None => Ok(Handled::No),
        }
    }

    /// Executes a command and scrolls to keep the cursor in view.
    pub fn execute(&mut self, cmd: Command) -> Result<(), EntryError> {
        log::trace!("executing {:?}", cmd);
        let vertical = matches!(
            cmd,
            Command::MoveUp | Command::MoveDown | Command::PageUp | Command::PageDown
        );

        match cmd {
            Command::InsertChar(ch) => self.insert_text(ch.encode_utf8(&mut [0u8; 4]))?,
            Command::InsertNewline => self.insert_text("\n")?,
            Command::InsertTab => self.insert_text("\t")?,
            Command::DeleteBackward => self.delete_backward()?,
            Command::DeleteForward => self.delete_forward()?,
            Command::DeleteSelection => {
                self.delete_selection()?;
            }
            Command::MoveLeft => self.move_left()?,
            Command::MoveRight => self.move_right()?,
            Command::MoveUp => self.move_vertical(false, 1)?,
            Command::MoveDown => self.move_vertical(true, 1)?,
            Command::PageUp => self.page(false)?,
            Command::PageDown => self.page(true)?,
            Command::MoveToLineStart => {
                self.buffer.clear_selection();
                let start = self.buffer.line_iter_at(self.buffer.cursor_iter())?;
                self.buffer.set_cursor_iter(start.char_iter())?;
            }
            Command::MoveToLineEnd => {
                self.buffer.clear_selection();
                let end = self.line_end_from(self.buffer.cursor_iter())?;
                self.buffer.set_cursor_iter(end)?;
            }
            Command::MoveToBufferStart => {
                self.buffer.clear_selection();
                self.buffer.set_cursor_iter(self.buffer.char_begin())?;
            }
            Command::MoveToBufferEnd => {
                self.buffer.clear_selection();
                self.buffer.set_cursor_iter(self.buffer.char_end())?;
            }
            Command::SelectAll => self.buffer.select_all(),
        }

        if !vertical {
            self.saved_column = None;
        }
        self.ensure_cursor_visible()?;
        Ok(())
    }

    // ==================== Editing ====================

    /// Runs one content mutation and revalidates the view marker across it.
    fn mutate(
        &mut self,
        site: EditSite,
        op: impl FnOnce(&mut TextBuffer),
    ) -> Result<(), EntryError> {
        let old_cursor = self.buffer.cursor_iter();
        let old_line_count = self.buffer.line_count();
        let generation = self.buffer.generation();

        op(&mut self.buffer);

        if self.buffer.generation() != generation {
            self.revalidate_marker(old_cursor, old_line_count, site)?;
        }
        Ok(())
    }

    /// Brings the first-visible marker and its line number up to date after
    /// a single mutation.
    fn revalidate_marker(
        &mut self,
        old_cursor: CharIter,
        old_line_count: usize,
        site: EditSite,
    ) -> Result<(), EntryError> {
        match site {
            EditSite::Reset => {
                self.first_visible = self.buffer.line_begin();
                self.first_visible_line = 0;
            }
            EditSite::Append => {
                self.first_visible = self
                    .buffer
                    .validate_line_iter(self.first_visible, old_cursor)?;
            }
            EditSite::Cursor => {
                let old_offset = self.first_visible.offset();
                let mapped = self
                    .buffer
                    .validate_char_iter(self.first_visible.char_iter(), old_cursor)?;

                // Edits happen at the cursor, so a marker at or before it
                // keeps its line. A marker swallowed by a deletion lands on
                // the cursor's line. Any other marker moves by the change in
                // line count.
                let line = if old_offset <= old_cursor.offset() {
                    self.first_visible_line
                } else if mapped.offset() == self.buffer.cursor_iter().offset() {
                    self.buffer.cursor_pos().line
                } else {
                    (self.first_visible_line + self.buffer.line_count())
                        .saturating_sub(old_line_count)
                };

                self.first_visible = self.buffer.line_iter_at(mapped)?;
                self.first_visible_line = line;
            }
        }
        Ok(())
    }

    /// Inserts text at the cursor, replacing the selection if there is one.
    fn insert_text(&mut self, text: &str) -> Result<(), EntryError> {
        if !self.multiline && text.contains(['\n', '\r']) {
            log::debug!("single-line entry ignored a line break");
            return Ok(());
        }
        self.delete_selection()?;
        self.mutate(EditSite::Cursor, |buf| buf.insert_string(text))
    }

    /// Deletes the selected text and leaves the cursor where it began.
    /// Returns false when nothing was selected.
    fn delete_selection(&mut self) -> Result<bool, EntryError> {
        if !self.buffer.has_selection() {
            return Ok(false);
        }
        let range = self.buffer.selection_range();
        let count = self.buffer.selected_text().chars().count();
        self.buffer.set_cursor_iter(range.start)?;
        self.mutate(EditSite::Cursor, |buf| {
            buf.delete_chars(count);
        })?;
        Ok(true)
    }

    fn delete_backward(&mut self) -> Result<(), EntryError> {
        if self.delete_selection()? {
            return Ok(());
        }
        let cursor = self.buffer.cursor_iter();
        if cursor.offset() == 0 {
            return Ok(());
        }
        let prev = cursor.backward(&self.buffer)?;
        self.buffer.set_cursor_iter(prev)?;
        self.mutate(EditSite::Cursor, |buf| {
            buf.delete_chars(1);
        })
    }

    fn delete_forward(&mut self) -> Result<(), EntryError> {
        if self.delete_selection()? {
            return Ok(());
        }
        self.mutate(EditSite::Cursor, |buf| {
            buf.delete_chars(1);
        })
    }

    // ==================== Movement ====================

    fn move_left(&mut self) -> Result<(), EntryError> {
        let target = if self.buffer.has_selection() {
            self.buffer.selection_range().start
        } else {
            self.buffer.cursor_iter().backward(&self.buffer)?
        };
        self.buffer.clear_selection();
        self.buffer.set_cursor_iter(target)?;
        Ok(())
    }

    fn move_right(&mut self) -> Result<(), EntryError> {
        let target = if self.buffer.has_selection() {
            self.buffer.selection_range().end
        } else {
            self.buffer.cursor_iter().forward(&self.buffer)?
        };
        self.buffer.clear_selection();
        self.buffer.set_cursor_iter(target)?;
        Ok(())
    }

    /// Position of the line break ending the line that contains `from`, or
    /// the end of the buffer.
    fn line_end_from(&self, from: CharIter) -> Result<CharIter, EntryError> {
        let mut it = from;
        while let Some(ch) = it.get(&self.buffer)? {
            if ch == '\n' {
                break;
            }
            it = it.forward(&self.buffer)?;
        }
        Ok(it)
    }

    /// Last position on `line` whose visual column does not exceed `goal`.
    fn column_in_line(&self, line: LineIter, goal: usize) -> Result<CharIter, EntryError> {
        let tab_spaces = self.buffer.tab_spaces();
        let mut it = line.char_iter();
        let mut col = 0;
        while let Some(ch) = it.get(&self.buffer)? {
            if ch == '\n' {
                break;
            }
            let next = advance_column(col, ch, tab_spaces);
            if next > goal {
                break;
            }
            col = next;
            it = it.forward(&self.buffer)?;
        }
        Ok(it)
    }

    /// Moves the cursor `count` lines up or down, aiming for the saved
    /// visual column. Past the first or last line the cursor goes to the
    /// start or end of the buffer.
    fn move_vertical(&mut self, down: bool, count: usize) -> Result<(), EntryError> {
        let goal = match self.saved_column {
            Some(col) => col,
            None => self.cursor_visual_column()?,
        };
        self.buffer.clear_selection();

        let current = self.buffer.cursor_pos().line;
        let available = if down {
            self.buffer.line_count() - current
        } else {
            current
        };

        let target = if available == 0 {
            if down {
                self.buffer.char_end()
            } else {
                self.buffer.char_begin()
            }
        } else {
            let mut line = self.buffer.line_iter_at(self.buffer.cursor_iter())?;
            for _ in 0..count.min(available) {
                line = if down {
                    line.forward(&self.buffer)?
                } else {
                    line.backward(&self.buffer)?
                };
            }
            self.column_in_line(line, goal)?
        };

        self.buffer.set_cursor_iter(target)?;
        self.saved_column = Some(goal);
        Ok(())
    }

    /// Moves the cursor and the view by one screen of lines.
    fn page(&mut self, down: bool) -> Result<(), EntryError> {
        let step = self.visible_lines;
        let top = if down {
            self.first_visible_line + step
        } else {
            self.first_visible_line.saturating_sub(step)
        };
        self.move_vertical(down, step)?;
        self.scroll_to_line(top.min(self.max_first_line()))?;
        Ok(())
    }

    // ==================== Scrolling ====================

    /// Highest line that can be at the top of the view while keeping the
    /// view full.
    fn max_first_line(&self) -> usize {
        (self.buffer.line_count() + 1).saturating_sub(self.visible_lines)
    }

    /// Scrolls the minimum distance that brings the cursor line into view.
    /// Returns true if the view moved.
    pub fn ensure_cursor_visible(&mut self) -> Result<bool, EntryError> {
        let line = self.buffer.cursor_pos().line;
        if line < self.first_visible_line {
            self.scroll_to_line(line)
        } else if line >= self.first_visible_line + self.visible_lines {
            self.scroll_to_line(line + 1 - self.visible_lines)
        } else {
            Ok(false)
        }
    }
}
