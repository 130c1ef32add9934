//! Keyboard handling.

use crossterm::event::KeyCode;

use super::app::App;
use crate::controller::Command;
use crate::game::{Coord, Step};

/// Moves cursor based on arrow keys.
pub fn move_cursor(cursor: Coord, key: KeyCode) -> Coord {
    match key {
        KeyCode::Up => cursor.step(Step::Up),
        KeyCode::Down => cursor.step(Step::Down),
        KeyCode::Left => cursor.step(Step::Left),
        KeyCode::Right => cursor.step(Step::Right),
        _ => cursor,
    }
}

/// Maps a key press to a controller command, updating local state.
///
/// An open notice swallows the next key. The thinking overlay blocks cell
/// activation but leaves reset and quit available.
pub fn handle_key(app: &mut App, key: KeyCode) -> Option<Command> {
    if app.notice().is_some() {
        app.dismiss_notice();
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Reset),
        KeyCode::Enter | KeyCode::Char(' ') if !app.thinking() => {
            Some(Command::Click(app.cursor()))
        }
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            app.set_cursor(move_cursor(app.cursor(), key));
            None
        }
        _ => None,
    }
}
