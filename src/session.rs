use crate::action::ActionState;
use crate::board::{cell::Player, Board};
use crate::effect::GameEvent;
use crate::victory::{self, Outcome, WinLine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The status of a game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// An ongoing game.
    InProgress,
    /// A finished game, won by the player with the given line.
    Won { player: Player, line: WinLine },
    /// A finished game, with a full board and no winner.
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The line to highlight, if the game has been won.
    pub fn winning_line(self) -> Option<WinLine> {
        match self {
            GameStatus::Won { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// Everything one game consists of. A reset throws the whole session away and starts a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) board: Board,
    pub(crate) current_player: Player,
    pub(crate) action: ActionState,
    pub(crate) status: GameStatus,
}

impl Session {
    /// A fresh game: empty board, X to move, placing markers.
    pub fn new() -> Self {
        Session {
            board: Board::new(),
            current_player: Player::X,
            action: ActionState::PlaceMarker,
            status: GameStatus::InProgress,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn action(&self) -> ActionState {
        self.action
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Passes the turn to the opponent. Does nothing once the game is over.
    pub(crate) fn switch_player(&mut self, events: &mut Vec<GameEvent>) {
        if self.status.is_over() {
            return;
        }

        self.current_player = self.current_player.opponent();
        debug!(player = %self.current_player, "turn changed");
        events.push(GameEvent::TurnChanged(self.current_player));
    }

    /// Ends the turn of the acting player: announces a win or a draw if there is one, otherwise passes the turn.
    ///
    /// Only the acting player's lines are checked, even when an explosion has flipped the opponent's markers. Once the
    /// game is over, nothing is evaluated or announced again.
    pub(crate) fn conclude_turn(&mut self, events: &mut Vec<GameEvent>) {
        if self.status.is_over() {
            return;
        }

        let player = self.current_player;

        match victory::evaluate(&self.board, player) {
            Outcome::Win(line) => {
                info!(%player, ?line, "game won");
                self.status = GameStatus::Won { player, line };
                events.push(GameEvent::GameWon { player, line });
            }
            Outcome::Draw => {
                info!("game drawn");
                self.status = GameStatus::Draw;
                events.push(GameEvent::GameDraw);
            }
            Outcome::Undecided => self.switch_player(events),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod test {
    use super::{GameStatus, Session};
    use crate::board::cell::Player;
    use crate::effect::{Effect, GameEvent};
    use crate::victory::WinLine;
    use rand::rngs::mock::StepRng;

    #[test]
    fn a_new_session_starts_with_x() {
        let session = Session::new();

        assert_eq!(session.current_player(), Player::X);
        assert_eq!(session.status(), GameStatus::InProgress);
        assert!(!session.status().is_over());
    }

    #[test]
    fn conclude_turn_switches_the_player_when_undecided() {
        let mut session = Session::new();
        let mut events = Vec::new();

        session.conclude_turn(&mut events);

        assert_eq!(session.current_player(), Player::O);
        assert_eq!(events, vec![GameEvent::TurnChanged(Player::O)]);
    }

    #[test]
    fn conclude_turn_announces_a_win_only_once() {
        let mut session = Session::new();
        for c in 0..5 {
            session.board.place_marker((0, c), Player::X).unwrap();
        }

        let mut events = Vec::new();
        session.conclude_turn(&mut events);
        session.conclude_turn(&mut events);

        assert_eq!(
            events,
            vec![GameEvent::GameWon {
                player: Player::X,
                line: WinLine::Row(0)
            }]
        );
        assert_eq!(session.current_player(), Player::X);
        assert_eq!(session.status().winning_line(), Some(WinLine::Row(0)));
    }

    #[test]
    fn switch_player_is_a_no_op_after_the_game_ends() {
        let mut session = Session::new();
        session.status = GameStatus::Draw;

        let mut events = Vec::new();
        session.switch_player(&mut events);

        assert!(events.is_empty());
        assert_eq!(session.current_player(), Player::X);
    }

    #[test]
    fn a_line_flipped_for_the_opponent_does_not_end_the_game() {
        let mut session = Session::new();
        for c in 0..4 {
            session.board.place_marker((0, c), Player::O).unwrap();
        }
        session.board.place_marker((0, 4), Player::X).unwrap();
        session.board.place_bomb((0, 4)).unwrap();
        session.board.add_fuse((0, 4), (1, 4)).unwrap();

        // X sets off the chain that completes O's row
        let outcome = session.attempt((1, 4), &mut StepRng::new(0, 0)).unwrap();

        let events = outcome.events();
        assert_eq!(
            events[events.len() - 2..],
            [
                GameEvent::Effect(Effect::cell((0, 4), 1)),
                GameEvent::TurnChanged(Player::O),
            ]
        );
        assert_eq!(session.board().cell((0, 4)).unwrap().marker(), Some(Player::O));
        assert_eq!(session.status(), GameStatus::InProgress);
        assert_eq!(session.current_player(), Player::O);
    }

    #[test]
    fn the_last_marker_on_a_full_board_draws() {
        let mut session = Session::new();
        let rows = ["XXOOX", "OOXXO", "XXOOX", "OOXXO", "XXOO"];
        for (r, row) in rows.iter().enumerate() {
            for (c, symbol) in row.chars().enumerate() {
                let player = if symbol == 'X' { Player::X } else { Player::O };
                session.board.place_marker((r as u8, c as u8), player).unwrap();
            }
        }
        session.current_player = Player::O;

        let outcome = session.attempt((4, 4), &mut StepRng::new(u64::MAX, 0)).unwrap();

        assert_eq!(
            outcome.events(),
            &[
                GameEvent::MarkerPlaced {
                    coord: (4, 4),
                    player: Player::O
                },
                GameEvent::GameDraw,
            ]
        );
        assert_eq!(session.status(), GameStatus::Draw);
        assert_eq!(session.current_player(), Player::O);
    }
}
