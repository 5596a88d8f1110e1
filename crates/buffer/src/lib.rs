// Chunk: docs/chunks/text_storage - Gap buffer text storage engine
// Chunk: docs/chunks/buffer_iterators - Byte, character and line iterators

//! textkit-buffer: the editable text storage engine behind textkit's text widgets.
//!
//! The main type is [`TextBuffer`], which provides:
//! - Canonical UTF-8 storage in a byte gap buffer, with the gap at the cursor
//! - O(1) character, line and byte counts, maintained per mutation
//! - Byte, character and line iterators ([`ByteIter`], [`CharIter`], [`LineIter`])
//! - Cursor tracking as a position and as (line, column)
//! - A selection range that follows its characters across edits
//! - Revalidation of iterators held across a mutation
//!
//! # Example
//!
//! ```
//! use textkit_buffer::{Position, TextBuffer};
//!
//! let mut buffer = TextBuffer::new();
//! buffer.insert_string("ab\ncd");
//! assert_eq!(buffer.char_count(), 5);
//! assert_eq!(buffer.line_count(), 1);
//! assert_eq!(buffer.cursor_pos(), Position::new(1, 2));
//!
//! // Keep a marker across an edit by revalidating it against the old cursor.
//! let marker = buffer.line_iter_for(1);
//! buffer.set_cursor_iter(buffer.char_begin()).unwrap();
//! let old_cursor = buffer.cursor_iter();
//! buffer.insert_string(">> ");
//! let marker = buffer.validate_line_iter(marker, old_cursor).unwrap();
//! assert_eq!(marker.offset(), 6);
//! ```
//!
//! # Iterator validity
//!
//! Iterators are plain values. Each carries the buffer's identity and the
//! generation it was taken at; any content mutation bumps the generation,
//! after which older iterators are rejected with
//! [`BufferError::InvalidIterator`] until revalidated. Moving the cursor is
//! not a content mutation and leaves iterators valid.
//!
//! The buffer is single-owner and not synchronized.

mod error;
mod gap_buffer;
mod iter;
mod text_buffer;
mod types;
pub mod utf8;

pub use error::{BufferError, IteratorFault, Result};
pub use iter::{BufferId, ByteIter, CharIter, Chars, LineIter, Lines};
pub use text_buffer::{BufferOptions, TextBuffer, DEFAULT_GAP_SIZE, DEFAULT_TAB_SPACES};
pub use types::Position;
