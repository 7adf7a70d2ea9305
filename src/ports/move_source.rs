//! Move source port - where the non-agent side of a game gets its moves.

use crate::{Result, tictactoe::Board};

/// Supplier of positions for one side of a game, typically a human.
///
/// Implementations may block while waiting for input. The core validates
/// every answer: an out-of-range or occupied position is rejected with
/// [`crate::Error::InvalidMove`] and never applied.
///
/// # Examples
///
/// ```
/// use tictactoe_td::{ports::MoveSource, tictactoe::Board};
///
/// struct FirstFree;
///
/// impl MoveSource for FirstFree {
///     fn next_move(&mut self, _board: &Board, available: &[usize]) -> tictactoe_td::Result<usize> {
///         available.first().copied().ok_or(tictactoe_td::Error::EmptyActionSet)
///     }
///
///     fn name(&self) -> &str {
///         "first-free"
///     }
/// }
/// ```
pub trait MoveSource {
    /// Produce a position for the current board.
    ///
    /// `available` lists the empty cells in scan order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InputClosed`] when no further moves can be
    /// produced.
    fn next_move(&mut self, board: &Board, available: &[usize]) -> Result<usize>;

    /// Display name used in scoreboards and logs.
    fn name(&self) -> &str;
}
