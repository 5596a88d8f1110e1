// Chunk: docs/chunks/editable_entry - Key events delivered to an entry
//!
//! Keyboard event types.
//!
//! Hosts translate their native key events into these types before handing
//! them to a [`TextEntry`](crate::TextEntry). Only the keys an editable text
//! field reacts to are modelled.

/// A keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The key that was pressed
    pub key: Key,
    /// Modifier keys held during the event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Creates a KeyEvent for a named key with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    /// Creates a KeyEvent for a single character with no modifiers.
    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }

    /// Creates a KeyEvent for a key with the command modifier held.
    pub fn command(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                command: true,
                ..Default::default()
            },
        }
    }
}

/// Modifier keys that can be held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Command key (Cmd/⌘ on macOS, the platform accelerator elsewhere)
    pub command: bool,
    /// Option key (Alt/⌥)
    pub option: bool,
    /// Control key (Ctrl/⌃)
    pub control: bool,
}

impl Modifiers {
    /// Returns true if no modifier keys are held.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.command && !self.option && !self.control
    }
}

/// Keys that can be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character (already accounts for shift state)
    Char(char),
    /// Backspace / Delete backward
    Backspace,
    /// Forward delete
    Delete,
    /// Return / Enter
    Return,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Escape,
    PageUp,
    PageDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_event_has_no_modifiers() {
        let event = KeyEvent::char('x');
        assert_eq!(event.key, Key::Char('x'));
        assert!(event.modifiers.is_empty());
    }

    #[test]
    fn test_command_event() {
        let event = KeyEvent::command(Key::Char('a'));
        assert!(event.modifiers.command);
        assert!(!event.modifiers.is_empty());
    }
}
