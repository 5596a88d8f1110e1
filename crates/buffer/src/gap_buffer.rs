// Chunk: docs/chunks/text_storage - Gap buffer text storage engine

//! Byte-level gap buffer.
//!
//! The store is a byte array split by a single gap:
//!
//! ```text
//!  [ before cursor | gap (free capacity) | after cursor ]
//!    0..gap_begin    gap_begin..cursor_index   cursor_index..data.len()
//! ```
//!
//! Logical text is `data[..gap_begin]` followed by `data[cursor_index..]`.
//! Inserting at the gap is O(1) until the gap is exhausted; the gap is then
//! grown by a fixed increment. Moving the gap is O(distance).
//!
//! This type knows nothing about UTF-8. Callers guarantee that the gap only
//! ever sits on a code-point boundary.

/// A byte store with a movable gap at the edit cursor.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Backing storage: [pre-gap content | gap | post-gap content].
    data: Vec<u8>,
    /// First free byte of the gap. Equal to the logical cursor offset.
    gap_begin: usize,
    /// First byte after the gap.
    cursor_index: usize,
    /// Growth increment (minus one) applied when the gap is exhausted.
    gap_size: usize,
}

impl GapBuffer {
    /// Creates an empty store whose gap starts out `gap_size` bytes wide.
    pub fn with_gap(gap_size: usize) -> Self {
        Self {
            data: vec![0; gap_size],
            gap_begin: 0,
            cursor_index: gap_size,
            gap_size,
        }
    }

    /// Logical length in bytes (gap excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current free capacity at the cursor.
    #[inline]
    pub fn gap_len(&self) -> usize {
        self.cursor_index - self.gap_begin
    }

    /// Logical offset of the gap, which is the cursor offset.
    #[inline]
    pub fn gap_position(&self) -> usize {
        self.gap_begin
    }

    /// Growth increment used by future gap exhaustion events.
    pub fn gap_size(&self) -> usize {
        self.gap_size
    }

    /// Changes the growth increment. Content and the current gap are untouched.
    pub fn set_gap_size(&mut self, gap_size: usize) {
        self.gap_size = gap_size;
    }

    /// Discards all content and reopens a `gap_size` gap at offset 0.
    pub fn reset(&mut self, gap_size: usize) {
        self.data.clear();
        self.data.resize(gap_size, 0);
        self.gap_begin = 0;
        self.cursor_index = gap_size;
        self.gap_size = gap_size;
    }

    /// Maps a logical offset to its storage index.
    ///
    /// The gap position itself maps to the first post-gap byte, never into
    /// the gap.
    #[inline]
    fn physical(&self, logical: usize) -> usize {
        if logical < self.gap_begin {
            logical
        } else {
            logical + self.gap_len()
        }
    }

    /// Returns the byte at a logical offset, or `None` at or past the end.
    #[inline]
    pub fn byte_at(&self, logical: usize) -> Option<u8> {
        if logical >= self.len() {
            return None;
        }
        Some(self.data[self.physical(logical)])
    }

    /// Moves the gap so that it starts at `logical` (clamped to the length).
    ///
    /// Bytes between the old and new gap position cross the gap; logical
    /// offsets of all content are unchanged.
    pub fn move_gap_to(&mut self, logical: usize) {
        let logical = logical.min(self.len());

        if logical < self.gap_begin {
            let shift = self.gap_begin - logical;
            self.data
                .copy_within(logical..self.gap_begin, self.cursor_index - shift);
            self.gap_begin = logical;
            self.cursor_index -= shift;
            log::trace!("gap moved left by {} to {}", shift, logical);
        } else if logical > self.gap_begin {
            let shift = logical - self.gap_begin;
            self.data
                .copy_within(self.cursor_index..self.cursor_index + shift, self.gap_begin);
            self.gap_begin += shift;
            self.cursor_index += shift;
            log::trace!("gap moved right by {} to {}", shift, logical);
        }
    }

    /// Widens an exhausted gap by `gap_size + 1` bytes, shifting the
    /// post-cursor run right. Returns the number of bytes added.
    fn grow_gap(&mut self) -> usize {
        let growth = self.gap_size + 1;
        let old_len = self.data.len();
        let post_len = old_len - self.cursor_index;

        self.data.resize(old_len + growth, 0);
        if post_len > 0 {
            self.data
                .copy_within(self.cursor_index..old_len, self.cursor_index + growth);
        }
        self.cursor_index += growth;

        log::trace!(
            "gap exhausted at {}; grew storage by {} to {} bytes",
            self.gap_begin,
            growth,
            self.data.len()
        );
        growth
    }

    /// Writes one byte at the cursor and advances the cursor past it.
    ///
    /// Returns the number of bytes the gap had to grow by first (0 when the
    /// gap still had room).
    pub fn insert_byte(&mut self, byte: u8) -> usize {
        let growth = if self.gap_begin == self.cursor_index {
            self.grow_gap()
        } else {
            0
        };
        self.data[self.gap_begin] = byte;
        self.gap_begin += 1;
        growth
    }

    /// Removes up to `count` bytes after the cursor by folding them into the gap.
    ///
    /// Returns the number of bytes actually removed.
    pub fn remove_after(&mut self, count: usize) -> usize {
        let count = count.min(self.data.len() - self.cursor_index);
        self.cursor_index += count;
        count
    }

    /// Appends bytes at the logical end, bypassing the gap.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Copies the logical range `[start, end)` out of the store.
    pub fn slice(&self, start: usize, end: usize) -> Vec<u8> {
        let start = start.min(self.len());
        let end = end.min(self.len());
        if start >= end {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(end - start);
        if start < self.gap_begin {
            out.extend_from_slice(&self.data[start..end.min(self.gap_begin)]);
        }
        if end > self.gap_begin {
            let from = self.physical(start.max(self.gap_begin));
            let to = self.physical(end);
            out.extend_from_slice(&self.data[from..to]);
        }
        out
    }

    /// Iterates over the logical bytes.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.data[..self.gap_begin]
            .iter()
            .chain(self.data[self.cursor_index..].iter())
            .copied()
    }
}
