//! Key mapping.

use milli_core::Key;

/// Represents an editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    // File operations
    Save,
    Quit,
    Find,

    // Text input
    InsertChar(u8),
    InsertNewline,

    // Deletion
    DeleteBackward,
    DeleteForward,

    // Cursor movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveToLineStart,
    MoveToLineEnd,
    MovePageUp,
    MovePageDown,
}

/// Maps a decoded key to a command. Returns `None` for ignored keys.
pub fn command_for_key(key: Key) -> Option<EditorCommand> {
    match key {
        Key::Char(b'\r') => Some(EditorCommand::InsertNewline),
        k if k.is_ctrl(b'q') => Some(EditorCommand::Quit),
        k if k.is_ctrl(b's') => Some(EditorCommand::Save),
        k if k.is_ctrl(b'f') => Some(EditorCommand::Find),
        k if k.is_ctrl(b'h') => Some(EditorCommand::DeleteBackward),
        k if k.is_ctrl(b'l') => None,
        Key::Backspace => Some(EditorCommand::DeleteBackward),
        Key::Delete => Some(EditorCommand::DeleteForward),
        Key::Escape => None,
        Key::ArrowLeft => Some(EditorCommand::MoveLeft),
        Key::ArrowRight => Some(EditorCommand::MoveRight),
        Key::ArrowUp => Some(EditorCommand::MoveUp),
        Key::ArrowDown => Some(EditorCommand::MoveDown),
        Key::Home => Some(EditorCommand::MoveToLineStart),
        Key::End => Some(EditorCommand::MoveToLineEnd),
        Key::PageUp => Some(EditorCommand::MovePageUp),
        Key::PageDown => Some(EditorCommand::MovePageDown),
        Key::Char(ch) => Some(EditorCommand::InsertChar(ch)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milli_core::ctrl_key;

    #[test]
    fn test_control_keys() {
        assert_eq!(command_for_key(Key::Char(ctrl_key(b'q'))), Some(EditorCommand::Quit));
        assert_eq!(command_for_key(Key::Char(ctrl_key(b's'))), Some(EditorCommand::Save));
        assert_eq!(command_for_key(Key::Char(ctrl_key(b'f'))), Some(EditorCommand::Find));
        assert_eq!(
            command_for_key(Key::Char(ctrl_key(b'h'))),
            Some(EditorCommand::DeleteBackward)
        );
        assert_eq!(command_for_key(Key::Char(ctrl_key(b'l'))), None);
        assert_eq!(command_for_key(Key::Escape), None);
    }

    #[test]
    fn test_text_keys() {
        assert_eq!(command_for_key(Key::Char(b'\r')), Some(EditorCommand::InsertNewline));
        assert_eq!(command_for_key(Key::Char(b'\t')), Some(EditorCommand::InsertChar(b'\t')));
        assert_eq!(command_for_key(Key::Char(b'a')), Some(EditorCommand::InsertChar(b'a')));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(command_for_key(Key::Home), Some(EditorCommand::MoveToLineStart));
        assert_eq!(command_for_key(Key::PageDown), Some(EditorCommand::MovePageDown));
        assert_eq!(command_for_key(Key::Delete), Some(EditorCommand::DeleteForward));
    }
}
