// Chunk: docs/chunks/buffer_iterators - Byte, character and line iterators

//! Positions over a [`TextBuffer`].
//!
//! Three iterator kinds refine each other:
//!
//! - [`ByteIter`] sits on any logical byte offset.
//! - [`CharIter`] sits on the first byte of a code point.
//! - [`LineIter`] sits on the first byte of a line (offset 0, or just after a `\n`).
//!
//! All three are plain `Copy` values holding the owning buffer's identity,
//! the buffer generation they were created at, and a logical byte offset.
//! Logical offsets ignore the gap, so relocating the cursor never moves an
//! iterator. Content mutations bump the generation; an iterator from an
//! older generation is rejected until it is revalidated through
//! [`TextBuffer::validate_char_iter`] or [`TextBuffer::validate_line_iter`].
//!
//! Stepping goes through the buffer and saturates at the ends:
//!
//! ```
//! use textkit_buffer::TextBuffer;
//!
//! let buf = TextBuffer::with_text("héllo");
//! let mut it = buf.char_begin();
//! for _ in 0..5 {
//!     it = it.forward(&buf).unwrap();
//! }
//! assert_eq!(it, buf.char_end());
//! assert_eq!(it.forward(&buf).unwrap(), buf.char_end());
//! ```

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::Result;
use crate::text_buffer::TextBuffer;
use crate::utf8::{self, Decoded};

/// Identity of one buffer instance.
///
/// Ids are handed out from a process-wide counter, which also gives
/// iterators from different buffers a stable total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(u64);

impl BufferId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

// ==================== Byte iterator ====================

/// A position on a logical byte offset.
#[derive(Debug, Clone, Copy)]
pub struct ByteIter {
    pub(crate) buffer: BufferId,
    pub(crate) generation: u64,
    pub(crate) offset: usize,
}

impl ByteIter {
    pub(crate) fn new(buffer: &TextBuffer, offset: usize) -> Self {
        Self {
            buffer: buffer.id(),
            generation: buffer.generation(),
            offset,
        }
    }

    fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    /// Logical byte offset from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Generation of the buffer when this iterator was produced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    /// Returns the byte at this position, or `None` at the end.
    pub fn get(&self, buf: &TextBuffer) -> Result<Option<u8>> {
        buf.verify(*self)?;
        Ok(buf.storage().byte_at(self.offset))
    }

    /// Steps one byte forward, stopping at the end.
    pub fn forward(self, buf: &TextBuffer) -> Result<Self> {
        buf.verify(self)?;
        Ok(self.with_offset((self.offset + 1).min(buf.byte_count())))
    }

    /// Steps one byte back, stopping at the start.
    pub fn backward(self, buf: &TextBuffer) -> Result<Self> {
        buf.verify(self)?;
        Ok(self.with_offset(self.offset.saturating_sub(1)))
    }
}

impl PartialEq for ByteIter {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer && self.offset == other.offset
    }
}

impl Eq for ByteIter {}

impl PartialOrd for ByteIter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteIter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.buffer
            .cmp(&other.buffer)
            .then_with(|| self.offset.cmp(&other.offset))
    }
}

// ==================== Character iterator ====================

/// A position on the first byte of a code point (or the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CharIter(pub(crate) ByteIter);

impl CharIter {
    pub fn byte_iter(&self) -> ByteIter {
        self.0
    }

    pub fn offset(&self) -> usize {
        self.0.offset
    }

    pub fn generation(&self) -> u64 {
        self.0.generation
    }

    /// Decodes the character at this position, or `None` at the end.
    pub fn get(&self, buf: &TextBuffer) -> Result<Option<char>> {
        buf.verify(self.0)?;
        Ok(char_at_offset(buf, self.0.offset))
    }

    /// Steps past the current code point.
    pub fn forward(self, buf: &TextBuffer) -> Result<Self> {
        buf.verify(self.0)?;
        Ok(Self(self.0.with_offset(next_char_offset(buf, self.0.offset))))
    }

    /// Steps back to the start of the previous code point.
    pub fn backward(self, buf: &TextBuffer) -> Result<Self> {
        buf.verify(self.0)?;
        Ok(Self(self.0.with_offset(prev_char_offset(buf, self.0.offset))))
    }
}

// ==================== Line iterator ====================

/// A position on the first byte of a line (or the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineIter(pub(crate) CharIter);

impl LineIter {
    pub fn char_iter(&self) -> CharIter {
        self.0
    }

    pub fn byte_iter(&self) -> ByteIter {
        self.0 .0
    }

    pub fn offset(&self) -> usize {
        self.0.offset()
    }

    pub fn generation(&self) -> u64 {
        self.0.generation()
    }

    /// Steps to the start of the next line, or to the end when this is the
    /// last line.
    pub fn forward(self, buf: &TextBuffer) -> Result<Self> {
        let inner = self.byte_iter();
        buf.verify(inner)?;
        let next = next_line_offset(buf, inner.offset);
        Ok(Self(CharIter(inner.with_offset(next))))
    }

    /// Steps to the start of the previous line, stopping at the first line.
    pub fn backward(self, buf: &TextBuffer) -> Result<Self> {
        let inner = self.byte_iter();
        buf.verify(inner)?;
        let prev = prev_line_offset(buf, inner.offset);
        Ok(Self(CharIter(inner.with_offset(prev))))
    }
}

// ==================== Offset arithmetic ====================

/// Copies up to four bytes starting at `offset` into a scratch array.
fn peek(buf: &TextBuffer, offset: usize, scratch: &mut [u8; 4]) -> usize {
    let store = buf.storage();
    let mut n = 0;
    while n < 4 {
        match store.byte_at(offset + n) {
            Some(b) => scratch[n] = b,
            None => break,
        }
        n += 1;
    }
    n
}

pub(crate) fn char_at_offset(buf: &TextBuffer, offset: usize) -> Option<char> {
    let mut scratch = [0u8; 4];
    let n = peek(buf, offset, &mut scratch);
    match utf8::decode(&scratch[..n]) {
        Decoded::Char { ch, .. } => Some(ch),
        _ => None,
    }
}

/// Offset just past the code point at `offset`.
pub(crate) fn next_char_offset(buf: &TextBuffer, offset: usize) -> usize {
    let len = buf.byte_count();
    match buf.storage().byte_at(offset) {
        Some(lead) => (offset + utf8::sequence_len(lead).unwrap_or(1)).min(len),
        None => len,
    }
}

/// Offset of the code point ending just before `offset`.
///
/// Scans back over at most three continuation bytes, then checks that the
/// lead byte found declares exactly that length and that the decoded value
/// is in canonical range. Anything else falls back to a single byte.
pub(crate) fn prev_char_offset(buf: &TextBuffer, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    let store = buf.storage();
    let floor = offset.saturating_sub(4);
    let mut start = offset - 1;
    while start > floor && store.byte_at(start).is_some_and(utf8::is_continuation) {
        start -= 1;
    }

    let width = offset - start;
    let mut scratch = [0u8; 4];
    let n = peek(buf, start, &mut scratch).min(width);
    let lead_matches = store
        .byte_at(start)
        .and_then(utf8::sequence_len)
        .is_some_and(|declared| declared == width);
    if lead_matches {
        if let Decoded::Char { ch, len } = utf8::decode(&scratch[..n]) {
            if len == width && u32::from(ch) >= utf8::min_code_point(len) {
                return start;
            }
        }
    }
    offset - 1
}

/// Moves a byte offset back onto the start of the code point containing it.
pub(crate) fn align_to_char(buf: &TextBuffer, offset: usize) -> usize {
    let store = buf.storage();
    let mut offset = offset.min(buf.byte_count());
    let mut steps = 0;
    while offset > 0 && steps < 3 && store.byte_at(offset).is_some_and(utf8::is_continuation) {
        offset -= 1;
        steps += 1;
    }
    offset
}

/// Start of the line containing `offset`.
pub(crate) fn line_start_at(buf: &TextBuffer, offset: usize) -> usize {
    let store = buf.storage();
    let mut start = offset.min(buf.byte_count());
    while start > 0 && store.byte_at(start - 1) != Some(b'\n') {
        start -= 1;
    }
    start
}

/// One past the next `\n` at or after `offset`, or the end of the buffer.
pub(crate) fn next_line_offset(buf: &TextBuffer, offset: usize) -> usize {
    let store = buf.storage();
    let len = buf.byte_count();
    let mut pos = offset;
    while pos < len {
        if store.byte_at(pos) == Some(b'\n') {
            return pos + 1;
        }
        pos += 1;
    }
    len
}

/// Start of the line before the one starting at `line_start`.
pub(crate) fn prev_line_offset(buf: &TextBuffer, line_start: usize) -> usize {
    if line_start == 0 {
        return 0;
    }
    let mut pos = line_start;
    if buf.storage().byte_at(pos - 1) == Some(b'\n') {
        pos -= 1;
    }
    line_start_at(buf, pos)
}

// ==================== Std iterator adapters ====================

/// Iterator over the characters of a buffer. See [`TextBuffer::chars`].
#[derive(Debug)]
pub struct Chars<'a> {
    buf: &'a TextBuffer,
    offset: usize,
}

impl<'a> Chars<'a> {
    pub(crate) fn new(buf: &'a TextBuffer) -> Self {
        Self { buf, offset: 0 }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        while self.offset < self.buf.byte_count() {
            let current = self.offset;
            self.offset = next_char_offset(self.buf, current);
            if let Some(ch) = char_at_offset(self.buf, current) {
                return Some(ch);
            }
        }
        None
    }
}

/// Iterator over line contents without their `\n`. See [`TextBuffer::lines`].
#[derive(Debug)]
pub struct Lines<'a> {
    buf: &'a TextBuffer,
    offset: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(buf: &'a TextBuffer) -> Self {
        Self { buf, offset: 0 }
    }
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let len = self.buf.byte_count();
        if self.offset >= len {
            return None;
        }
        let start = self.offset;
        let next = next_line_offset(self.buf, start);
        let end = if self.buf.storage().byte_at(next.saturating_sub(1)) == Some(b'\n') {
            next - 1
        } else {
            next
        };
        self.offset = next;
        Some(self.buf.text_between(start, end))
    }
}
