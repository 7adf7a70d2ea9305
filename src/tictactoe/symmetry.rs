//! D4 symmetry group operations for N×N boards

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell};
use crate::types::Signature;

/// D4 symmetry transformation (dihedral group of the square)
///
/// Applied as `quarter_turns` clockwise rotations followed by an optional
/// transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct D4Transform {
    /// Number of 90° clockwise rotations (0-3)
    pub quarter_turns: u8,
    /// Whether to transpose after rotating
    pub transpose: bool,
}

impl D4Transform {
    /// All 8 transforms: identity, its transpose, then each successive
    /// rotation followed by its transpose.
    pub fn all() -> Vec<D4Transform> {
        let mut transforms = Vec::with_capacity(8);
        for quarter_turns in 0..4 {
            transforms.push(D4Transform {
                quarter_turns,
                transpose: false,
            });
            transforms.push(D4Transform {
                quarter_turns,
                transpose: true,
            });
        }
        transforms
    }

    /// Where the cell at `pos` lands on a board of side `size`
    pub fn transform_position(&self, pos: usize, size: usize) -> usize {
        let (mut row, mut col) = (pos / size, pos % size);

        for _ in 0..self.quarter_turns {
            (row, col) = (col, size - 1 - row);
        }

        if self.transpose {
            (row, col) = (col, row);
        }

        row * size + col
    }

    /// Apply transform to a board
    pub fn apply(&self, board: &Board) -> Board {
        let size = board.size();
        let mut cells = vec![Cell::Empty; size * size];
        for (idx, &cell) in board.cells().iter().enumerate() {
            cells[self.transform_position(idx, size)] = cell;
        }
        Board::from_cells(size, cells)
    }
}

impl Board {
    /// 90° clockwise rotation
    #[must_use = "rotate returns a new board; the original is unchanged"]
    pub fn rotate(&self) -> Board {
        D4Transform {
            quarter_turns: 1,
            transpose: false,
        }
        .apply(self)
    }

    /// Matrix transpose
    #[must_use = "transpose returns a new board; the original is unchanged"]
    pub fn transpose(&self) -> Board {
        D4Transform {
            quarter_turns: 0,
            transpose: true,
        }
        .apply(self)
    }

    /// The 8 symmetric images of the board in [`D4Transform::all`] order.
    /// Symmetric boards repeat entries.
    pub fn symmetries(&self) -> Vec<Board> {
        D4Transform::all().iter().map(|t| t.apply(self)).collect()
    }

    /// Distinct signatures of every symmetric image, including the board's own.
    pub fn symmetric_signatures(&self) -> BTreeSet<Signature> {
        self.symmetries().iter().map(Board::signature).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_rotate_clockwise() {
        // First column becomes the first row, read bottom-up
        let board = Board::parse("O.. ... X..").unwrap();
        let rotated = board.rotate();
        assert_eq!(rotated, Board::parse("X.O ... ...").unwrap());
    }

    #[test]
    fn test_transpose() {
        let board = Board::parse("OX. ... ...").unwrap();
        assert_eq!(board.transpose(), Board::parse("O.. X.. ...").unwrap());
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for size in 2..=5 {
            let mut board = Board::new(size).unwrap();
            board.apply_move(0, Player::P1).unwrap();
            board.apply_move(1, Player::P2).unwrap();
            let spun = board.rotate().rotate().rotate().rotate();
            assert_eq!(spun, board);
            assert_ne!(board.rotate(), board);
        }
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let board = Board::parse("OX.. ..X. O... ...X").unwrap();
        assert_eq!(board.transpose().transpose(), board);
    }

    #[test]
    fn test_transforms_do_not_mutate() {
        let board = Board::parse("OX. ... ...").unwrap();
        let copy = board.clone();
        let _ = board.rotate();
        let _ = board.transpose();
        assert_eq!(board, copy);
    }

    #[test]
    fn test_corner_has_four_images() {
        let board = Board::parse("O.. ... ...").unwrap();
        let sigs = board.symmetric_signatures();
        assert_eq!(sigs.len(), 4);
        assert!(sigs.contains(&board.signature()));
    }

    #[test]
    fn test_asymmetric_board_has_eight_images() {
        let board = Board::parse("OX. ... ...").unwrap();
        assert_eq!(board.symmetric_signatures().len(), 8);
    }

    #[test]
    fn test_empty_and_center_boards_are_fixed_points() {
        assert_eq!(Board::new(3).unwrap().symmetric_signatures().len(), 1);
        assert_eq!(
            Board::parse("... .O. ...").unwrap().symmetric_signatures().len(),
            1
        );
    }

    #[test]
    fn test_enumeration_order() {
        let board = Board::parse("OX. ... ...").unwrap();
        let images = board.symmetries();
        assert_eq!(images[0], board);
        assert_eq!(images[1], board.transpose());
        assert_eq!(images[2], board.rotate());
        assert_eq!(images[3], board.rotate().transpose());
        assert_eq!(images[6], board.rotate().rotate().rotate());
    }
}
