//! Common test utilities for the tictactoe-td test suite.

#![allow(dead_code)]

use tictactoe_td::{
    config::AgentConfig,
    td_learning::{ValueAgent, ValueTable},
    tictactoe::{Board, Player},
};

/// Agent that never explores.
pub fn greedy_agent(name: &str, board_size: usize) -> ValueAgent {
    ValueAgent::new(AgentConfig::new(name).with_epsilon(0.0), board_size)
        .expect("valid agent config")
}

/// Greedy agent with α = γ = 1, so a backup copies the reward verbatim.
pub fn copying_agent(name: &str, table: ValueTable) -> ValueAgent {
    let config = AgentConfig::new(name)
        .with_epsilon(0.0)
        .with_learning_rate(1.0)
        .with_discount(1.0);
    ValueAgent::with_values(config, table).expect("valid agent config")
}

/// Boards after each move of `moves`, played alternately starting with P1.
pub fn boards_after(board_size: usize, moves: &[usize]) -> Vec<(Player, Board)> {
    let mut board = Board::new(board_size).expect("valid board size");
    let mut player = Player::P1;
    moves
        .iter()
        .map(|&position| {
            board
                .apply_move(position, player)
                .expect("scripted move is legal");
            let mover = player;
            player = player.opponent();
            (mover, board.clone())
        })
        .collect()
}

/// Tables that make two greedy agents replay `moves` exactly: every
/// afterstate on the script is worth 1.0 to the side that produces it.
pub fn scripted_tables(board_size: usize, moves: &[usize]) -> (ValueTable, ValueTable) {
    let mut p1 = ValueTable::new(board_size).expect("valid board size");
    let mut p2 = ValueTable::new(board_size).expect("valid board size");
    for (player, board) in boards_after(board_size, moves) {
        match player {
            Player::P1 => p1.set(board.signature(), 1.0),
            Player::P2 => p2.set(board.signature(), 1.0),
        }
    }
    (p1, p2)
}
