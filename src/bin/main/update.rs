//! The terminal application updater.

use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuse_rs::{ActionKind, GameError};

/// The support for the app controls.
pub trait ControlsSupport {
    fn move_cursor(&mut self, direction: MoveCursorDirection);
    fn perform_main_action(&mut self) -> Result<(), GameError>;
    fn select_action(&mut self, kind: ActionKind) -> Result<(), GameError>;
    fn reset(&mut self);
    fn leave(&mut self, force: bool);
}

/// The available directions to move the cursor to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

pub fn update(app: &mut App, key_event: KeyEvent) -> Result<(), GameError> {
    use MoveCursorDirection::*;

    match key_event.code {
        KeyCode::Up | KeyCode::Char('i') | KeyCode::Char('w') => app.move_cursor(Up),
        KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('a') => app.move_cursor(Left),
        KeyCode::Down | KeyCode::Char('k') | KeyCode::Char('s') => app.move_cursor(Down),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => app.move_cursor(Right),
        KeyCode::Enter | KeyCode::Char(' ') => app.perform_main_action()?,
        KeyCode::Char('m') => app.select_action(ActionKind::PlaceMarker)?,
        KeyCode::Char('b') => app.select_action(ActionKind::PlaceBomb)?,
        KeyCode::Char('f') => app.select_action(ActionKind::PlaceFuse)?,
        KeyCode::Char('r') => app.reset(),
        KeyCode::Esc | KeyCode::Char('q') => app.leave(false),
        KeyCode::Char('c') => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                app.leave(true);
            }
        }
        _ => {}
    };

    Ok(())
}
