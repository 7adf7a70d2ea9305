//! Move source that replays a fixed list of positions.

use std::collections::VecDeque;

use crate::{Result, error::Error, ports::MoveSource, tictactoe::Board};

/// Replays 0-based positions in order.
///
/// Answers are not checked against the board, so a script can feed the core
/// an illegal move on purpose. Running out of moves yields
/// [`Error::InputClosed`].
#[derive(Debug, Clone)]
pub struct ScriptedMoveSource {
    name: String,
    moves: VecDeque<usize>,
}

impl ScriptedMoveSource {
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.into(),
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSource for ScriptedMoveSource {
    fn next_move(&mut self, _board: &Board, _available: &[usize]) -> Result<usize> {
        self.moves.pop_front().ok_or(Error::InputClosed)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
