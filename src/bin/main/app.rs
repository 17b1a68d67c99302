//! The terminal application

use crate::animation::Playback;
use crate::game_ui::render_game;
use crate::tui::Render;
use crate::update::{ControlsSupport, MoveCursorDirection};
use fuse_rs::{ActionKind, ActionOutcome, Coord, FuseTacToe, GameError, BOARD_SIZE};
use ratatui::Frame;
use std::cmp;
use std::time::Duration;
use tracing::debug;

/// The terminal application
#[derive(Debug)]
pub struct App {
    pub game: AppGame,
    /// Indicates that the main application loop should be broken on the next tick and thus the app should quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(game: FuseTacToe, level_delay: Duration) -> App {
        App {
            game: AppGame::new(game, level_delay),
            should_quit: false,
        }
    }

    pub fn tick(&mut self) {
        if self.game.should_leave || self.game.should_emergency_leave {
            self.quit();
        }

        self.game.tick();
    }

    /// Quit the application altogether.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl ControlsSupport for App {
    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        self.game.move_cursor(direction);
    }

    fn perform_main_action(&mut self) -> Result<(), GameError> {
        self.game.act_or_confirm_leave()
    }

    fn select_action(&mut self, kind: ActionKind) -> Result<(), GameError> {
        self.game.select_action(kind)
    }

    fn reset(&mut self) {
        self.game.reset();
    }

    fn leave(&mut self, force: bool) {
        if force {
            self.game.emergency_leave();
        } else {
            self.game.confirm_or_cancel_leave_or_leave();
        }
    }
}

impl Render for App {
    fn render(&mut self, frame: &mut Frame) {
        render_game(&self.game, frame);
    }
}

/// The game part of the app
#[derive(Debug)]
pub struct AppGame {
    /// The game instance.
    pub game: FuseTacToe,
    /// The position of the currently selected cell.
    pub cursor_position: Coord,
    /// The explosion currently being played back, if any.
    pub playback: Option<Playback>,
    /// The delay between two consecutive levels of an explosion playback.
    level_delay: Duration,
    /// Whether the cancel key was pressed and now the game's in the state of waiting for a confirmation from the user
    /// to leave.
    pub awaiting_leave_confirmation: bool,
    /// Whether the leave was confirmed.
    pub should_leave: bool,
    /// Whether the app should urgently leave without asking for a confirmation
    pub should_emergency_leave: bool,
}

impl AppGame {
    fn new(game: FuseTacToe, level_delay: Duration) -> Self {
        AppGame {
            game,
            cursor_position: (BOARD_SIZE / 2, BOARD_SIZE / 2),
            playback: None,
            level_delay,
            awaiting_leave_confirmation: false,
            should_leave: false,
            should_emergency_leave: false,
        }
    }

    fn tick(&mut self) {
        if self.playback.as_ref().is_some_and(Playback::is_finished) {
            self.playback = None;
        }
    }

    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        // don't move the cursor when waiting for the leave confirmation or when the game's already finished
        if self.awaiting_leave_confirmation || self.game.status().is_over() {
            return;
        }

        let (cy, cx) = self.cursor_position;

        self.cursor_position = match direction {
            MoveCursorDirection::Up => (cy.saturating_sub(1), cx),
            MoveCursorDirection::Left => (cy, cx.saturating_sub(1)),
            MoveCursorDirection::Down => (cmp::min(cy + 1, BOARD_SIZE - 1), cx),
            MoveCursorDirection::Right => (cy, cmp::min(cx + 1, BOARD_SIZE - 1)),
        };
    }

    fn act_or_confirm_leave(&mut self) -> Result<(), GameError> {
        if self.awaiting_leave_confirmation {
            self.leave();
            return Ok(());
        }

        if self.game.status().is_over() {
            // if the game has ended, start a new one
            self.reset();
            return Ok(());
        }

        match self.game.attempt_action(self.cursor_position)? {
            ActionOutcome::Applied(events) => {
                if let Some(playback) = Playback::start(&events, self.level_delay) {
                    self.playback = Some(playback);
                }
            }
            ActionOutcome::Rejected(reason) => debug!(%reason, "nothing to do"),
        }

        Ok(())
    }

    fn select_action(&mut self, kind: ActionKind) -> Result<(), GameError> {
        if self.awaiting_leave_confirmation || self.game.status().is_over() {
            return Ok(());
        }

        self.game.select_action(kind)
    }

    fn reset(&mut self) {
        self.game.reset();
        self.playback = None;
        self.awaiting_leave_confirmation = false;
    }

    fn confirm_or_cancel_leave_or_leave(&mut self) {
        if self.game.status().is_over() {
            // if the game has ended, just leave without asking for confirmation
            self.leave();
        } else {
            // otherwise, ask for confirmation
            self.awaiting_leave_confirmation = !self.awaiting_leave_confirmation;
        }
    }

    fn leave(&mut self) {
        self.should_leave = true;
    }

    fn emergency_leave(&mut self) {
        self.should_emergency_leave = true;
    }
}

#[cfg(test)]
mod test {
    use super::App;
    use crate::update::{ControlsSupport, MoveCursorDirection};
    use fuse_rs::{ActionKind, FuseTacToe, GameStatus, Player};
    use rand::rngs::mock::StepRng;
    use std::time::Duration;

    fn app() -> App {
        App::new(
            FuseTacToe::with_rng(StepRng::new(0, 0)),
            Duration::from_millis(100),
        )
    }

    #[test]
    fn the_cursor_stays_on_the_board() {
        let mut app = app();

        for _ in 0..10 {
            app.move_cursor(MoveCursorDirection::Down);
            app.move_cursor(MoveCursorDirection::Left);
        }

        assert_eq!(app.game.cursor_position, (4, 0));
    }

    #[test]
    fn an_explosion_starts_a_playback() {
        let mut app = app();

        app.select_action(ActionKind::PlaceBomb).unwrap();
        app.perform_main_action().unwrap();
        assert!(app.game.playback.is_none());

        app.select_action(ActionKind::PlaceMarker).unwrap();
        app.perform_main_action().unwrap();

        assert!(app.game.playback.is_some());
        assert_eq!(app.game.game.current_player(), Player::X);
    }

    #[test]
    fn leaving_an_ongoing_game_needs_a_confirmation() {
        let mut app = app();

        app.leave(false);
        assert!(app.game.awaiting_leave_confirmation);
        app.tick();
        assert!(!app.should_quit);

        app.perform_main_action().unwrap();
        app.tick();
        assert!(app.should_quit);
    }

    #[test]
    fn acting_on_a_finished_game_starts_a_new_one() {
        let mut app = app();

        app.move_cursor(MoveCursorDirection::Up);
        app.move_cursor(MoveCursorDirection::Up);

        // X takes the middle column, O the one to the left of it
        for _ in 0..4 {
            app.perform_main_action().unwrap();
            app.move_cursor(MoveCursorDirection::Left);
            app.perform_main_action().unwrap();
            app.move_cursor(MoveCursorDirection::Right);
            app.move_cursor(MoveCursorDirection::Down);
        }
        app.perform_main_action().unwrap();
        assert!(matches!(app.game.game.status(), GameStatus::Won { player: Player::X, .. }));

        app.perform_main_action().unwrap();
        assert_eq!(app.game.game.status(), GameStatus::InProgress);
    }
}
