//! Key mapping from terminal events to engine commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key to the command it buffers.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        // Shifting
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::ShiftLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::ShiftRight),

        // Rotation
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => Some(Command::RotateClockwise),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Command::RotateCounterClockwise),

        // Drop
        KeyCode::Down | KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::ManualDrop)
        }

        KeyCode::Enter => Some(Command::Start),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
