//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing self-play training,
//! allowing composable data collection without coupling the trainer to
//! specific output formats or metrics.

use crate::{
    Result,
    tictactoe::{Board, GameOutcome, Move},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_rounds)` - once at the beginning
/// 2. For each round:
///    - `on_round_start(round)`
///    - `on_move(...)` - for each move, after it is applied
///    - `on_round_end(round, outcome, final_board)` - after both agents have
///      been updated
/// 3. `on_training_end()` - once at the end
///
/// All methods default to doing nothing.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_td::{
///     ports::Observer,
///     tictactoe::{Board, GameOutcome},
/// };
///
/// struct TieCounter {
///     ties: usize,
/// }
///
/// impl Observer for TieCounter {
///     fn on_round_end(
///         &mut self,
///         _round: usize,
///         outcome: GameOutcome,
///         _board: &Board,
///     ) -> tictactoe_td::Result<()> {
///         if outcome == GameOutcome::Tie {
///             self.ties += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_rounds: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a round starts (0-based index).
    fn on_round_start(&mut self, _round: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each move is applied.
    ///
    /// # Parameters
    ///
    /// * `round` - Index of the current round
    /// * `step` - Move number within the round (0-based)
    /// * `mv` - The move that was played
    /// * `board` - Board after the move
    fn on_move(&mut self, _round: usize, _step: usize, _mv: Move, _board: &Board) -> Result<()> {
        Ok(())
    }

    /// Called once the round is terminal and both agents have learned from it.
    fn on_round_end(&mut self, _round: usize, _outcome: GameOutcome, _board: &Board) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
