// Chunk: docs/chunks/text_storage - Gap buffer text storage engine
// Chunk: docs/chunks/cursor_tracking - Incremental cursor line/column tracking

//! TextBuffer is the public API of the storage engine.
//!
//! It combines the byte-level [`GapBuffer`] with incrementally maintained
//! character and line counters, the edit cursor (always at the gap), a
//! selection range, and the bookkeeping needed to revalidate iterators
//! across a mutation.
//!
//! Every entry point that accepts text takes `impl AsRef<[u8]>` and runs the
//! bytes through the UTF-8 normalizer, so `&str`, `String` and raw byte
//! slices are all accepted and the store only ever holds canonical UTF-8.

use std::ops::Range;

use crate::error::{IteratorFault, Result};
use crate::gap_buffer::GapBuffer;
use crate::iter::{self, BufferId, ByteIter, CharIter, Chars, LineIter, Lines};
use crate::types::Position;
use crate::utf8;

/// Gap reserved by multi-line buffers, which absorb long runs of
/// single-character insertions at the cursor.
pub const DEFAULT_GAP_SIZE: usize = 64;

/// Default tab stop width in columns.
pub const DEFAULT_TAB_SPACES: usize = 8;

/// Construction-time tuning. Neither knob affects logical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    /// Gap growth increment.
    pub gap_size: usize,
    /// Tab stop width, consumed by hosts computing visual columns.
    pub tab_spaces: usize,
}

impl BufferOptions {
    /// Options for single-line fields: no reserved gap.
    pub fn single_line() -> Self {
        Self {
            gap_size: 0,
            ..Self::default()
        }
    }
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            gap_size: DEFAULT_GAP_SIZE,
            tab_spaces: DEFAULT_TAB_SPACES,
        }
    }
}

/// What the most recent content mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    /// Bytes removed after, or inserted before, the cursor.
    AtCursor { removed: usize, inserted: usize },
    /// Bytes appended at the end.
    Append,
    /// Whole content replaced.
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct Edit {
    /// Generation the buffer was at before the edit.
    from_generation: u64,
    kind: EditKind,
}

/// Which side of an insertion a position exactly at the insertion point lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gravity {
    Before,
    After,
}

/// Maps a pre-edit offset through an edit at `at`.
///
/// Offsets before the edit stay, offsets inside a removed span collapse onto
/// `at`, and later offsets shift by `inserted - removed`.
fn map_offset(offset: usize, at: usize, removed: usize, inserted: usize, gravity: Gravity) -> usize {
    if offset < at || (offset == at && gravity == Gravity::Before) {
        offset
    } else if removed > 0 && offset <= at + removed {
        at
    } else {
        offset - removed + inserted
    }
}

/// An editable text store with cursor, selection and iterator support.
///
/// The buffer maintains:
/// - content in a byte gap buffer whose gap always sits at the cursor
/// - character and line (`\n`) counts, updated per mutation
/// - the cursor's (line, column), updated by walking from its previous value
/// - a selection as a half-open byte range, empty ranges normalized to `[0, 0)`
#[derive(Debug)]
pub struct TextBuffer {
    id: BufferId,
    generation: u64,
    store: GapBuffer,
    char_count: usize,
    line_count: usize,
    cursor_pos: Position,
    /// Selection as logical byte offsets; `begin < end`, or both zero.
    selection: (usize, usize),
    tab_spaces: usize,
    last_edit: Option<Edit>,
    /// Mutation counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl TextBuffer {
    /// Creates an empty multi-line buffer.
    pub fn new() -> Self {
        Self::with_options("", BufferOptions::default())
    }

    /// Creates an empty single-line buffer (no reserved gap).
    pub fn single_line() -> Self {
        Self::with_options("", BufferOptions::single_line())
    }

    /// Creates a multi-line buffer holding `text`, cursor at the start.
    pub fn with_text(text: impl AsRef<[u8]>) -> Self {
        Self::with_options(text, BufferOptions::default())
    }

    pub fn with_options(text: impl AsRef<[u8]>, options: BufferOptions) -> Self {
        let mut buf = Self {
            id: BufferId::next(),
            generation: 0,
            store: GapBuffer::with_gap(options.gap_size),
            char_count: 0,
            line_count: 0,
            cursor_pos: Position::default(),
            selection: (0, 0),
            tab_spaces: options.tab_spaces,
            last_edit: None,
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        };
        let text = utf8::normalize(text.as_ref());
        buf.append_normalized(&text);
        buf.last_edit = None;
        buf.generation = 0;
        buf
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of content mutations applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn storage(&self) -> &GapBuffer {
        &self.store
    }

    /// Number of code points.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Number of `\n` bytes.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Logical length in bytes.
    pub fn byte_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the whole content.
    pub fn text(&self) -> String {
        self.text_between(0, self.byte_count())
    }

    pub(crate) fn text_between(&self, start: usize, end: usize) -> String {
        let bytes = self.store.slice(start, end);
        // Content is canonical and ranges fall on code-point boundaries.
        String::from_utf8(bytes)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }

    /// Returns the text between two character positions (empty if reversed).
    pub fn text_range(&self, begin: CharIter, end: CharIter) -> Result<String> {
        self.verify(begin.byte_iter())?;
        self.verify(end.byte_iter())?;
        Ok(self.text_between(begin.offset(), end.offset()))
    }

    /// Decodes the character at `at`, or `None` at the end.
    pub fn char_at(&self, at: CharIter) -> Result<Option<char>> {
        at.get(self)
    }

    /// Iterates over the characters of the buffer.
    pub fn chars(&self) -> Chars<'_> {
        Chars::new(self)
    }

    /// Iterates over line contents, with the same splitting rules as
    /// [`str::lines`] for `\n`-terminated text.
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self)
    }

    // ==================== Tuning ====================

    pub fn gap_size(&self) -> usize {
        self.store.gap_size()
    }

    /// Changes the growth increment used the next time the gap is exhausted.
    pub fn set_gap_size(&mut self, gap_size: usize) {
        self.store.set_gap_size(gap_size);
    }

    pub fn tab_spaces(&self) -> usize {
        self.tab_spaces
    }

    pub fn set_tab_spaces(&mut self, tab_spaces: usize) {
        self.tab_spaces = tab_spaces;
    }

    // ==================== Iterators ====================

    pub fn byte_begin(&self) -> ByteIter {
        ByteIter::new(self, 0)
    }

    pub fn byte_end(&self) -> ByteIter {
        ByteIter::new(self, self.byte_count())
    }

    pub fn char_begin(&self) -> CharIter {
        CharIter(self.byte_begin())
    }

    pub fn char_end(&self) -> CharIter {
        CharIter(self.byte_end())
    }

    pub fn line_begin(&self) -> LineIter {
        LineIter(self.char_begin())
    }

    /// The end sentinel for line iteration, equal to [`Self::char_end`].
    pub fn line_end(&self) -> LineIter {
        LineIter(self.char_end())
    }

    /// Refines a byte iterator to the start of the code point containing it.
    pub fn char_iter_at(&self, at: ByteIter) -> Result<CharIter> {
        self.verify(at)?;
        Ok(CharIter(ByteIter::new(self, iter::align_to_char(self, at.offset))))
    }

    /// Refines a character iterator to the start of its line.
    pub fn line_iter_at(&self, at: CharIter) -> Result<LineIter> {
        self.verify(at.byte_iter())?;
        let start = iter::line_start_at(self, at.offset());
        Ok(LineIter(CharIter(ByteIter::new(self, start))))
    }

    /// Start of line `line` (0-based), clamped to the last line.
    pub fn line_iter_for(&self, line: usize) -> LineIter {
        let mut offset = 0;
        for _ in 0..line.min(self.line_count) {
            offset = iter::next_line_offset(self, offset);
        }
        LineIter(CharIter(ByteIter::new(self, offset)))
    }

    /// Checks that an iterator belongs to this buffer, is current, and is in range.
    pub(crate) fn verify(&self, at: ByteIter) -> Result<()> {
        let fault = if at.buffer != self.id {
            Some(IteratorFault::ForeignBuffer)
        } else if at.generation != self.generation {
            Some(IteratorFault::Stale {
                captured: at.generation,
                current: self.generation,
            })
        } else if at.offset > self.byte_count() {
            Some(IteratorFault::OutOfRange {
                offset: at.offset,
                len: self.byte_count(),
            })
        } else {
            None
        };

        match fault {
            Some(fault) => {
                log::warn!("rejected iterator at offset {}: {}", at.offset, fault);
                Err(fault.into())
            }
            None => Ok(()),
        }
    }

    // ==================== Cursor ====================

    /// Returns the cursor as a character iterator.
    pub fn cursor_iter(&self) -> CharIter {
        CharIter(ByteIter::new(self, self.store.gap_position()))
    }

    /// Returns the cursor as (line, column).
    pub fn cursor_pos(&self) -> Position {
        self.cursor_pos
    }

    /// Moves the cursor (and the gap) to `target`.
    ///
    /// The line/column is derived by walking line starts from the current
    /// cursor toward the target and then counting characters from the
    /// target's line start, so the cost follows the distance travelled.
    /// The selection keeps covering the same characters.
    pub fn set_cursor_iter(&mut self, target: CharIter) -> Result<()> {
        self.verify(target.byte_iter())?;
        let from = self.store.gap_position();
        let to = target.offset();
        if from == to {
            return Ok(());
        }

        let mut line = self.cursor_pos.line;
        let mut line_start = iter::line_start_at(self, from);
        if to > from {
            loop {
                let next = iter::next_line_offset(self, line_start);
                if next == line_start
                    || next > to
                    || self.store.byte_at(next - 1) != Some(b'\n')
                {
                    break;
                }
                line += 1;
                line_start = next;
            }
        } else {
            while line_start > to {
                line_start = iter::prev_line_offset(self, line_start);
                line = line.saturating_sub(1);
            }
        }

        let mut col = 0;
        let mut offset = line_start;
        while offset < to {
            offset = iter::next_char_offset(self, offset);
            col += 1;
        }

        self.cursor_pos = Position::new(line, col);
        self.store.move_gap_to(to);
        Ok(())
    }

    // ==================== Selection ====================

    /// Returns the selection as a half-open range of character positions.
    pub fn selection_range(&self) -> Range<CharIter> {
        let (begin, end) = self.selection;
        CharIter(ByteIter::new(self, begin))..CharIter(ByteIter::new(self, end))
    }

    /// Sets the selection. A range with `begin >= end` collapses to `[0, 0)`.
    pub fn set_selection_range(&mut self, range: Range<CharIter>) -> Result<()> {
        self.verify(range.start.byte_iter())?;
        self.verify(range.end.byte_iter())?;
        self.selection = (range.start.offset(), range.end.offset());
        self.normalize_selection();
        Ok(())
    }

    /// Returns the selected text (empty when nothing is selected).
    pub fn selected_text(&self) -> String {
        let (begin, end) = self.selection;
        self.text_between(begin, end)
    }

    pub fn has_selection(&self) -> bool {
        self.selection.0 < self.selection.1
    }

    pub fn clear_selection(&mut self) {
        self.selection = (0, 0);
    }

    pub fn select_all(&mut self) {
        self.selection = (0, self.byte_count());
        self.normalize_selection();
    }

    fn normalize_selection(&mut self) {
        let (begin, end) = self.selection;
        if begin >= end && (begin, end) != (0, 0) {
            log::debug!("selection [{}, {}) collapsed to [0, 0)", begin, end);
            self.selection = (0, 0);
        }
    }

    fn remap_selection(&mut self, at: usize, removed: usize, inserted: usize) {
        let (begin, end) = self.selection;
        if begin == end {
            return;
        }
        self.selection = (
            map_offset(begin, at, removed, inserted, Gravity::After),
            map_offset(end, at, removed, inserted, Gravity::After),
        );
        self.normalize_selection();
    }

    // ==================== Revalidation ====================

    /// Brings a character iterator captured before the latest mutation up to date.
    ///
    /// `old_cursor` must be the cursor as it was immediately before that
    /// mutation, captured at the same generation as `iter`. Positions before
    /// the edit point are kept, positions inside deleted text collapse onto
    /// the edit point, and later positions follow the content they were on.
    /// A position exactly at an insertion point stays before the inserted
    /// text. Iterators from the current generation are returned unchanged.
    ///
    /// Only a single intervening mutation can be reconciled; iterators older
    /// than that are reported as stale.
    pub fn validate_char_iter(&self, iter: CharIter, old_cursor: CharIter) -> Result<CharIter> {
        let it = iter.byte_iter();
        let anchor = old_cursor.byte_iter();
        if it.buffer != self.id || anchor.buffer != self.id {
            return Err(IteratorFault::ForeignBuffer.into());
        }
        if it.generation == self.generation {
            self.verify(it)?;
            return Ok(iter);
        }
        if anchor.generation != it.generation {
            return Err(IteratorFault::AnchorMismatch.into());
        }

        let edit = match self.last_edit {
            Some(edit) if edit.from_generation == it.generation => edit,
            _ => {
                return Err(IteratorFault::Stale {
                    captured: it.generation,
                    current: self.generation,
                }
                .into())
            }
        };

        let offset = match edit.kind {
            EditKind::AtCursor { removed, inserted } => {
                map_offset(it.offset, anchor.offset, removed, inserted, Gravity::Before)
            }
            EditKind::Append => it.offset,
            EditKind::Reset => 0,
        };
        if offset > self.byte_count() {
            return Err(IteratorFault::OutOfRange {
                offset,
                len: self.byte_count(),
            }
            .into());
        }

        Ok(CharIter(ByteIter::new(self, iter::align_to_char(self, offset))))
    }

    /// Line-iterator form of [`Self::validate_char_iter`]; the result is
    /// moved back to the start of its line.
    pub fn validate_line_iter(&self, iter: LineIter, old_cursor: CharIter) -> Result<LineIter> {
        let current = self.validate_char_iter(iter.char_iter(), old_cursor)?;
        self.line_iter_at(current)
    }

    // ==================== Validation ====================

    /// Debug assertion: verifies that the incremental counters match a
    /// fresh scan of the content.
    ///
    /// Checks every 64th mutation so the O(n) scan stays out of tight loops.
    #[cfg(debug_assertions)]
    fn assert_counters_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let chars = self
            .store
            .bytes()
            .filter(|&b| !utf8::is_continuation(b))
            .count();
        let lines = self.store.bytes().filter(|&b| b == b'\n').count();
        assert_eq!(
            (self.char_count, self.line_count),
            (chars, lines),
            "counter drift detected after {} mutations (cursor {:?}, {} bytes)",
            self.debug_mutation_count,
            self.cursor_pos,
            self.byte_count(),
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_counters_consistent(&mut self) {}

    // ==================== Mutations ====================

    fn record_edit(&mut self, kind: EditKind) {
        self.last_edit = Some(Edit {
            from_generation: self.generation,
            kind,
        });
        self.generation += 1;
        self.assert_counters_consistent();
    }

    fn append_normalized(&mut self, text: &str) {
        self.store.append(text.as_bytes());
        self.char_count += text.chars().count();
        self.line_count += text.bytes().filter(|&b| b == b'\n').count();
    }

    /// Replaces the whole content. Cursor, selection and counters are reset
    /// and the cursor ends up at the start.
    pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
        let text = utf8::normalize(text.as_ref());
        let gap_size = self.store.gap_size();
        self.store.reset(gap_size);
        self.char_count = 0;
        self.line_count = 0;
        self.cursor_pos = Position::default();
        self.selection = (0, 0);
        self.append_normalized(&text);

        log::debug!(
            "buffer {:?} reset to {} bytes ({} lines)",
            self.id,
            self.byte_count(),
            self.line_count
        );
        self.record_edit(EditKind::Reset);
    }

    /// Appends text at the end without moving the cursor.
    pub fn append_string(&mut self, text: impl AsRef<[u8]>) {
        let text = utf8::normalize(text.as_ref());
        if text.is_empty() {
            return;
        }
        self.append_normalized(&text);
        self.record_edit(EditKind::Append);
    }

    /// Inserts text at the cursor; the cursor ends up after it.
    ///
    /// Selection endpoints at or after the cursor move with the content that
    /// follows the cursor.
    pub fn insert_string(&mut self, text: impl AsRef<[u8]>) {
        let text = utf8::normalize(text.as_ref());
        if text.is_empty() {
            return;
        }

        let at = self.store.gap_position();
        let mut encoded = [0u8; 4];
        for ch in text.chars() {
            for &byte in ch.encode_utf8(&mut encoded).as_bytes() {
                self.store.insert_byte(byte);
            }
            self.char_count += 1;
            if ch == '\n' {
                self.line_count += 1;
                self.cursor_pos.line += 1;
                self.cursor_pos.col = 0;
            } else {
                self.cursor_pos.col += 1;
            }
        }

        self.remap_selection(at, 0, text.len());
        self.record_edit(EditKind::AtCursor {
            removed: 0,
            inserted: text.len(),
        });
    }

    /// Deletes up to `count` characters after the cursor.
    ///
    /// Stops early at the end of the buffer. Returns how many characters
    /// were deleted.
    pub fn delete_chars(&mut self, count: usize) -> usize {
        let at = self.store.gap_position();
        let mut deleted = 0;
        let mut removed = 0;

        while deleted < count {
            let Some(lead) = self.store.byte_at(at) else {
                break;
            };
            let width = iter::next_char_offset(self, at) - at;
            if lead == b'\n' {
                self.line_count -= 1;
            }
            removed += self.store.remove_after(width);
            self.char_count -= 1;
            deleted += 1;
        }

        if removed > 0 {
            self.remap_selection(at, removed, 0);
            self.record_edit(EditKind::AtCursor {
                removed,
                inserted: 0,
            });
        }
        deleted
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TextBuffer {
    /// Clones content and state under a fresh identity; iterators from the
    /// original are not valid on the clone.
    fn clone(&self) -> Self {
        Self {
            id: BufferId::next(),
            generation: self.generation,
            store: self.store.clone(),
            char_count: self.char_count,
            line_count: self.line_count,
            cursor_pos: self.cursor_pos,
            selection: self.selection,
            tab_spaces: self.tab_spaces,
            last_edit: self.last_edit,
            #[cfg(debug_assertions)]
            debug_mutation_count: self.debug_mutation_count,
        }
    }
}

impl std::fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}
