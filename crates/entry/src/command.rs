// Chunk: docs/chunks/editable_entry - Stateless key-to-command resolution
//!
//! Editing commands and the chord table that produces them.
//!
//! Every supported chord is a single modifier+key combination, so resolution
//! is a pure function of the event and the entry mode. No chord state is kept
//! between events.

use crate::input::{Key, KeyEvent};

/// Commands that can be executed on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert a newline at the cursor (multi-line entries only)
    InsertNewline,
    /// Insert a tab character
    InsertTab,
    /// Delete the selection, or the character before the cursor
    DeleteBackward,
    /// Delete the selection, or the character after the cursor
    DeleteForward,
    /// Delete the selected text, if any
    DeleteSelection,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveToLineStart,
    MoveToLineEnd,
    MoveToBufferStart,
    MoveToBufferEnd,
    /// Move the cursor and the view up by one screen of lines
    PageUp,
    /// Move the cursor and the view down by one screen of lines
    PageDown,
    SelectAll,
}

impl Command {
    /// Returns true for commands that change the buffer content.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_)
                | Command::InsertNewline
                | Command::InsertTab
                | Command::DeleteBackward
                | Command::DeleteForward
                | Command::DeleteSelection
        )
    }
}

/// Resolves a key event to a command.
///
/// Single-line entries leave Return, Tab and vertical movement unresolved so
/// the host can use them for activation and focus traversal.
pub fn resolve_command(event: &KeyEvent, multiline: bool) -> Option<Command> {
    let mods = &event.modifiers;

    match event.key {
        // Cmd+A → select everything
        Key::Char('a') if mods.command && !mods.control => Some(Command::SelectAll),

        // Ctrl+A / Ctrl+E → line start / end (Emacs-style)
        Key::Char('a') if mods.control && !mods.command => Some(Command::MoveToLineStart),
        Key::Char('e') if mods.control && !mods.command => Some(Command::MoveToLineEnd),

        // Printable characters (no Command/Control modifier)
        Key::Char('\n') | Key::Char('\r') if !mods.command && !mods.control => {
            multiline.then_some(Command::InsertNewline)
        }
        Key::Char(ch) if !mods.command && !mods.control && !ch.is_control() => {
            Some(Command::InsertChar(ch))
        }

        Key::Return if multiline && !mods.command && !mods.control => Some(Command::InsertNewline),
        Key::Tab if multiline && mods.is_empty() => Some(Command::InsertTab),

        Key::Backspace => Some(Command::DeleteBackward),
        Key::Delete => Some(Command::DeleteForward),

        // Cmd+Left or Home → start of line
        Key::Left if mods.command => Some(Command::MoveToLineStart),
        Key::Home if !mods.command => Some(Command::MoveToLineStart),

        // Cmd+Right or End → end of line
        Key::Right if mods.command => Some(Command::MoveToLineEnd),
        Key::End if !mods.command => Some(Command::MoveToLineEnd),

        Key::Left => Some(Command::MoveLeft),
        Key::Right => Some(Command::MoveRight),

        // Cmd+Up / Cmd+Home → start of buffer
        Key::Up | Key::Home if mods.command => Some(Command::MoveToBufferStart),
        // Cmd+Down / Cmd+End → end of buffer
        Key::Down | Key::End if mods.command => Some(Command::MoveToBufferEnd),

        Key::Up if multiline => Some(Command::MoveUp),
        Key::Down if multiline => Some(Command::MoveDown),
        Key::PageUp if multiline => Some(Command::PageUp),
        Key::PageDown if multiline => Some(Command::PageDown),

        _ => None,
    }
}
