//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{MAX_BOARD_SIZE, lines::LineAnalyzer};
use crate::types::Signature;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    P1,
    P2,
}

impl Cell {
    /// Character used in persisted signatures.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::P1 => 'O',
            Cell::P2 => 'X',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'O' | 'o' => Some(Cell::P1),
            'X' | 'x' => Some(Cell::P2),
            _ => None,
        }
    }

    /// Character used when printing a board for a human.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::P1 => 'o',
            Cell::P2 => 'x',
        }
    }

    pub(crate) fn digit(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::P1 => 1,
            Cell::P2 => 2,
        }
    }

    pub(crate) fn from_digit(digit: u8) -> Cell {
        match digit {
            1 => Cell::P1,
            2 => Cell::P2,
            _ => Cell::Empty,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::P1 => Some(Player::P1),
            Cell::P2 => Some(Player::P2),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::P1 => Cell::P1,
            Player::P2 => Cell::P2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::P1 => write!(f, "P1"),
            Player::P2 => write!(f, "P2"),
        }
    }
}

/// An N×N grid of cells stored row-major (`index = row * N + col`).
///
/// The cell count is fixed at `N²` for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board of the given side length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBoardSize`] unless `1 <= size <= MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Result<Self, crate::Error> {
        validate_size(size)?;
        Ok(Board {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Build a board from raw cells. `cells.len()` must equal `size * size`.
    pub(crate) fn from_cells(size: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Board { size, cells }
    }

    /// Parse a board from its row-major character form, e.g. `"OOX.X...."`.
    ///
    /// Whitespace is ignored and the side length is inferred from the number
    /// of cells.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedSignature`] if the cell count is not a
    /// perfect square or a character is not a cell.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let count = cleaned.chars().count();
        let size = (1..=MAX_BOARD_SIZE)
            .find(|n| n * n == count)
            .ok_or_else(|| crate::Error::MalformedSignature {
                key: cleaned.clone(),
                reason: format!("{count} cells do not form a supported square board"),
            })?;
        Ok(Signature::parse(&cleaned, size)?.to_board(size))
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get cell at position
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells.get(pos) == Some(&Cell::Empty)
    }

    /// Empty positions in ascending scan order
    pub fn available_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `player`'s symbol at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMove`] if `pos` is out of range or the
    /// cell is occupied. The board is left untouched in that case.
    pub fn apply_move(&mut self, pos: usize, player: Player) -> Result<(), crate::Error> {
        match self.cells.get_mut(pos) {
            None => Err(crate::Error::out_of_bounds(pos, self.size * self.size)),
            Some(cell) if *cell != Cell::Empty => Err(crate::Error::occupied(pos)),
            Some(cell) => {
                *cell = player.to_cell();
                Ok(())
            }
        }
    }

    /// Copy of the board with `player` placed at `pos`
    #[must_use = "with_move returns a new board; the original is unchanged"]
    pub fn with_move(&self, pos: usize, player: Player) -> Result<Board, crate::Error> {
        let mut next = self.clone();
        next.apply_move(pos, player)?;
        Ok(next)
    }

    /// Winner along the first complete line (rows, then columns, then diagonals)
    pub fn winner(&self) -> Option<Player> {
        LineAnalyzer::winner(&self.cells, self.size)
    }

    /// No empty cell remains
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    pub fn signature(&self) -> Signature {
        Signature::from(self)
    }
}

pub(crate) fn validate_size(size: usize) -> Result<(), crate::Error> {
    if (1..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(crate::Error::InvalidBoardSize { size })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = cells.iter().map(|c| format!(" {} ", c.symbol())).collect();
            write!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = Board::new(3).unwrap();
        assert_eq!(board.cells().len(), 9);
        assert!(board.cells().iter().all(|&c| c == Cell::Empty));
    }

    #[test]
    fn test_rejects_unsupported_sizes() {
        assert!(matches!(
            Board::new(0),
            Err(crate::Error::InvalidBoardSize { size: 0 })
        ));
        assert!(Board::new(MAX_BOARD_SIZE + 1).is_err());
        assert!(Board::new(MAX_BOARD_SIZE).is_ok());
    }

    #[test]
    fn test_apply_move() {
        let mut board = Board::new(3).unwrap();
        board.apply_move(4, Player::P1).unwrap();
        assert_eq!(board.get(4), Cell::P1);

        let err = board.apply_move(4, Player::P2).unwrap_err();
        assert!(err.to_string().contains("occupied"));
        assert_eq!(board.get(4), Cell::P1);
    }

    #[test]
    fn test_apply_move_out_of_bounds_leaves_board_untouched() {
        let mut board = Board::new(3).unwrap();
        let before = board.clone();
        let err = board.apply_move(9, Player::P1).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMove { position: 9, .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_available_positions_in_scan_order() {
        let board = Board::parse("O.X.O....").unwrap();
        assert_eq!(board.available_positions(), vec![1, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_with_move_does_not_mutate() {
        let board = Board::new(3).unwrap();
        let next = board.with_move(0, Player::P2).unwrap();
        assert_eq!(board.get(0), Cell::Empty);
        assert_eq!(next.get(0), Cell::P2);
    }

    #[test]
    fn test_top_row_winner() {
        let board = Board::parse("OOO XX. ...").unwrap();
        assert_eq!(board.winner(), Some(Player::P1));
    }

    #[test]
    fn test_full_board_without_line_is_tie() {
        let board = Board::parse("OXO OXX XOX").unwrap();
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_parse_infers_size() {
        let board = Board::parse("O... .... .... ...X").unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.get(15), Cell::P2);
        assert!(Board::parse("O.X.O").is_err());
    }

    #[test]
    fn test_display() {
        let board = Board::parse("O.X......").unwrap();
        assert_eq!(board.to_string(), " o | _ | x \n _ | _ | _ \n _ | _ | _ ");
    }
}
