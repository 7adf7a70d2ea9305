//! Newtype wrappers for board keys.

use serde::{Deserialize, Serialize};

use crate::tictactoe::{Board, Cell};

/// Canonical identifier of a board, used as the value table's key.
///
/// The cells are packed base-3 with the first cell as the least significant
/// digit (`Empty = 0`, `P1 = 1`, `P2 = 2`). A signature only identifies a board
/// together with its size, so tables record the size they were built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature(u128);

impl Signature {
    /// Pack a sequence of cells.
    pub fn from_cells(cells: &[Cell]) -> Self {
        let packed = cells
            .iter()
            .rev()
            .fold(0u128, |acc, &cell| acc * 3 + u128::from(cell.digit()));
        Signature(packed)
    }

    /// Unpack into `count` cells.
    pub fn to_cells(self, count: usize) -> Vec<Cell> {
        let mut remaining = self.0;
        (0..count)
            .map(|_| {
                let digit = (remaining % 3) as u8;
                remaining /= 3;
                Cell::from_digit(digit)
            })
            .collect()
    }

    /// Parse the persistence form: one character per cell, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedSignature`] when the key does not hold
    /// exactly `board_size²` cell characters.
    pub fn parse(key: &str, board_size: usize) -> Result<Self, crate::Error> {
        let expected = board_size * board_size;
        let chars: Vec<char> = key.chars().collect();
        if chars.len() != expected {
            return Err(crate::Error::MalformedSignature {
                key: key.to_string(),
                reason: format!("expected {expected} cells, got {}", chars.len()),
            });
        }

        let cells = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Cell::from_char(c).ok_or_else(|| crate::Error::MalformedSignature {
                    key: key.to_string(),
                    reason: format!("invalid character '{c}' at position {i}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_cells(&cells))
    }

    /// Render the persistence form for a board of `board_size`.
    pub fn encode(self, board_size: usize) -> String {
        self.to_cells(board_size * board_size)
            .into_iter()
            .map(Cell::to_char)
            .collect()
    }

    /// Decode into a board of `board_size`.
    pub fn to_board(self, board_size: usize) -> Board {
        Board::from_cells(board_size, self.to_cells(board_size * board_size))
    }

    /// Raw packed value.
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl From<&Board> for Signature {
    fn from(board: &Board) -> Self {
        Signature::from_cells(board.cells())
    }
}
