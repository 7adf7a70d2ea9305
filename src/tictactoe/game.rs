//! Per-round game lifecycle

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Player};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Tie,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Tie => None,
        }
    }
}

/// Where a game stands after the last game-over check.
///
/// Exactly one variant holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Tie,
}

impl GameStatus {
    pub fn outcome(self) -> Option<GameOutcome> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(GameOutcome::Win(player)),
            GameStatus::Tie => Some(GameOutcome::Tie),
        }
    }

    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// The single live game of a round.
///
/// Owns its board; players only ever see `&Board` snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    starting_player: Player,
    still_going: bool,
    winner: Option<Player>,
    moves: Vec<Move>,
}

impl GameState {
    /// Fresh game on an empty `size`×`size` board with P1 to move.
    pub fn new(size: usize) -> Result<Self, crate::Error> {
        Self::new_with_player(size, Player::P1)
    }

    pub fn new_with_player(size: usize, starting_player: Player) -> Result<Self, crate::Error> {
        Ok(Self::from_board(Board::new(size)?, starting_player))
    }

    /// Resume from an arbitrary board. Call [`Self::check_if_game_over`] to
    /// pick up a finished position.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        GameState {
            board,
            current_player: to_move,
            starting_player: to_move,
            still_going: true,
            winner: None,
            moves: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    pub fn still_going(&self) -> bool {
        self.still_going
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Moves played since the last reset, in order
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn available_positions(&self) -> Vec<usize> {
        self.board.available_positions()
    }

    /// Play the current player's symbol at `position`, hand the turn over and
    /// run the game-over check.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::GameOver`] once the game has finished
    /// - [`crate::Error::InvalidMove`] for an out-of-range or occupied cell;
    ///   nothing is mutated in that case
    pub fn play(&mut self, position: usize) -> Result<GameStatus, crate::Error> {
        if !self.still_going {
            return Err(crate::Error::GameOver);
        }

        self.board.apply_move(position, self.current_player)?;
        self.moves.push(Move {
            position,
            player: self.current_player,
        });
        self.current_player = self.current_player.opponent();

        Ok(self.check_if_game_over())
    }

    /// Record a winner or a full board; `still_going` drops to false exactly
    /// when either holds.
    pub fn check_if_game_over(&mut self) -> GameStatus {
        self.winner = self.board.winner();
        if self.winner.is_some() || self.board.is_full() {
            self.still_going = false;
        }
        self.status()
    }

    pub fn status(&self) -> GameStatus {
        match (self.winner, self.still_going) {
            (Some(player), _) => GameStatus::Won(player),
            (None, false) => GameStatus::Tie,
            (None, true) => GameStatus::InProgress,
        }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.status().outcome()
    }

    /// Back to an empty board with the starting player to move
    pub fn reset(&mut self) {
        let size = self.board.size();
        self.board = Board::from_cells(size, vec![Cell::Empty; size * size]);
        self.current_player = self.starting_player;
        self.still_going = true;
        self.winner = None;
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(game: &mut GameState, moves: &[usize]) -> GameStatus {
        let mut status = game.status();
        for &pos in moves {
            status = game.play(pos).unwrap();
        }
        status
    }

    #[test]
    fn test_players_alternate() {
        let mut game = GameState::new(3).unwrap();
        assert_eq!(game.current_player(), Player::P1);
        game.play(0).unwrap();
        assert_eq!(game.current_player(), Player::P2);
        assert_eq!(game.board().get(0), Cell::P1);
        game.play(1).unwrap();
        assert_eq!(game.board().get(1), Cell::P2);
        assert_eq!(game.moves().len(), 2);
    }

    #[test]
    fn test_top_row_win_for_p1() {
        let mut game = GameState::new(3).unwrap();
        let status = play_all(&mut game, &[0, 3, 1, 4, 2]);
        assert_eq!(status, GameStatus::Won(Player::P1));
        assert!(!game.still_going());
        assert_eq!(game.outcome(), Some(GameOutcome::Win(Player::P1)));
    }

    #[test]
    fn test_tie() {
        let mut game = GameState::new(3).unwrap();
        // O X O / O X X / X O O
        let status = play_all(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(status, GameStatus::Tie);
        assert_eq!(game.winner(), None);
        assert!(game.board().is_full());
    }

    #[test]
    fn test_win_on_last_cell_is_not_a_tie() {
        let mut game = GameState::new(3).unwrap();
        // P1 completes the main diagonal with the ninth move
        let status = play_all(&mut game, &[0, 1, 2, 5, 3, 6, 4, 7, 8]);
        assert!(game.board().is_full());
        assert_eq!(status, GameStatus::Won(Player::P1));
    }

    #[test]
    fn test_play_after_game_over_fails() {
        let mut game = GameState::new(3).unwrap();
        play_all(&mut game, &[0, 3, 1, 4, 2]);
        assert!(matches!(game.play(8), Err(crate::Error::GameOver)));
    }

    #[test]
    fn test_invalid_move_does_not_change_turn() {
        let mut game = GameState::new(3).unwrap();
        game.play(4).unwrap();
        assert!(matches!(
            game.play(4),
            Err(crate::Error::InvalidMove { position: 4, .. })
        ));
        assert!(game.play(42).is_err());
        assert_eq!(game.current_player(), Player::P2);
        assert_eq!(game.moves().len(), 1);
    }

    #[test]
    fn test_reset_restores_starting_player() {
        let mut game = GameState::new_with_player(3, Player::P2).unwrap();
        play_all(&mut game, &[0, 3, 1, 4, 2]);
        game.reset();
        assert!(game.still_going());
        assert_eq!(game.winner(), None);
        assert_eq!(game.current_player(), Player::P2);
        assert_eq!(game.available_positions().len(), 9);
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_exactly_one_status_for_every_reachable_board() {
        // Exhaustive over every 2x2 board state, both players to move.
        let cells = [Cell::Empty, Cell::P1, Cell::P2];
        for code in 0..81usize {
            let mut rest = code;
            let layout: Vec<Cell> = (0..4)
                .map(|_| {
                    let cell = cells[rest % 3];
                    rest /= 3;
                    cell
                })
                .collect();
            for to_move in [Player::P1, Player::P2] {
                let board = Board::from_cells(2, layout.clone());
                let mut game = GameState::from_board(board.clone(), to_move);
                let status = game.check_if_game_over();
                let flags = [
                    game.winner() == Some(Player::P1),
                    game.winner() == Some(Player::P2),
                    !game.still_going() && game.winner().is_none(),
                    game.still_going(),
                ];
                assert_eq!(flags.iter().filter(|&&f| f).count(), 1, "{board:?}");
                assert_eq!(status.is_over(), !game.still_going());
            }
        }
    }
}
