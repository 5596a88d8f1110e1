// Chunk: docs/chunks/editable_entry - Editing widget model over the text storage engine

//! textkit-entry: the editable text entry model that hosts a [`TextBuffer`].
//!
//! This crate sits between a host toolkit and the storage engine. The host
//! delivers [`KeyEvent`]s and draws what [`TextEntry::visible_text`] returns;
//! the entry resolves keys to [`Command`]s, edits the buffer, and keeps the
//! view positioned over the cursor.
//!
//! # Example
//!
//! ```
//! use textkit_entry::{EntryConfig, Key, KeyEvent, TextEntry};
//!
//! let mut entry = TextEntry::new(&EntryConfig::default());
//! for ch in "hi".chars() {
//!     entry.handle_key(KeyEvent::char(ch)).unwrap();
//! }
//! entry.handle_key(KeyEvent::plain(Key::Return)).unwrap();
//! entry.handle_key(KeyEvent::char('!')).unwrap();
//! assert_eq!(entry.text(), "hi\n!");
//! assert_eq!(entry.visible_text().unwrap(), vec!["hi", "!"]);
//! ```

mod command;
mod config;
mod entry;
mod error;
mod input;

pub use command::{resolve_command, Command};
pub use config::{EntryConfig, DEFAULT_VISIBLE_LINES};
pub use entry::{advance_column, Handled, TextEntry};
pub use error::EntryError;
pub use input::{Key, KeyEvent, Modifiers};

pub use textkit_buffer::{Position, TextBuffer};
