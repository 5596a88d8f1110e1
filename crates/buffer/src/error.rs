// Chunk: docs/chunks/iterator_revalidation - Invalid iterator reporting

//! Error types for the text storage engine.
//!
//! Content operations never fail: malformed input is repaired by the
//! normalizer and over-long deletions stop at the end of the buffer. The only
//! failure is handing the buffer an iterator it cannot honour, which is a
//! logic error in the caller (usually a stale iterator that was never
//! revalidated).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BufferError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BufferError {
    #[error("invalid iterator: {0}")]
    InvalidIterator(#[from] IteratorFault),
}

/// Why an iterator was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IteratorFault {
    #[error("iterator belongs to a different buffer")]
    ForeignBuffer,
    #[error("offset {offset} is past the end of a {len}-byte buffer")]
    OutOfRange { offset: usize, len: usize },
    #[error("captured at generation {captured}, buffer is at generation {current}")]
    Stale { captured: u64, current: u64 },
    #[error("anchor was captured at a different generation than the iterator")]
    AnchorMismatch,
}
