// Chunk: docs/chunks/editable_entry - Entry error reporting

use textkit_buffer::BufferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryError {
    /// The storage engine rejected an iterator the entry held. This means
    /// the entry's markers went out of sync with its buffer.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("invalid entry configuration: {0}")]
    Config(#[from] serde_json::Error),
}
