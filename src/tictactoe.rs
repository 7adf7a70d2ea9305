//! N×N tic-tac-toe rules and board geometry

pub mod board;
pub mod game;
pub mod lines;
pub mod symmetry;

pub use board::{Board, Cell, Player};
pub use game::{GameOutcome, GameState, GameStatus, Move};
pub use lines::LineAnalyzer;
pub use symmetry::D4Transform;

/// Largest supported side length; 3^(8·8) still fits a `u128` signature.
pub const MAX_BOARD_SIZE: usize = 8;

/// Side length of the classic game
pub const DEFAULT_BOARD_SIZE: usize = 3;
