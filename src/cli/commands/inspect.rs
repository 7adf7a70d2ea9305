//! Inspect command - Statistics about a saved policy

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::{
        output::{format_number, print_kv, print_section, print_subsection},
        storage::{PolicyFormat, load_policy},
    },
    td_learning::ValueTable,
    tictactoe::{Board, Cell, Player},
    types::Signature,
};

#[derive(Parser, Debug)]
#[command(about = "Show statistics about a saved policy", allow_negative_numbers = true)]
pub struct InspectArgs {
    /// Policy file (.json, or .msgpack/.mp)
    pub policy: PathBuf,

    /// Board side length; read from the file when omitted
    #[arg(long, short = 's')]
    pub board_size: Option<usize>,

    /// Number of highest-valued states to list
    #[arg(long, short = 't', default_value_t = 5)]
    pub top: usize,

    /// Show the value of every move from this position (e.g. "O...X....")
    #[arg(long)]
    pub position: Option<String>,
}

/// Summary statistics of a value table
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyStats {
    pub states: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Number of states per count of occupied cells
    pub by_pieces: BTreeMap<usize, usize>,
}

impl PolicyStats {
    pub fn from_table(table: &ValueTable) -> Self {
        let n = table.board_size();
        let mut by_pieces = BTreeMap::new();
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);

        for (signature, &value) in table.iter() {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            let pieces = signature
                .to_cells(n * n)
                .into_iter()
                .filter(|&cell| cell != Cell::Empty)
                .count();
            *by_pieces.entry(pieces).or_insert(0) += 1;
        }

        if table.is_empty() {
            (min, max) = (0.0, 0.0);
        }
        let mean = if table.is_empty() {
            0.0
        } else {
            sum / table.len() as f64
        };

        Self {
            states: table.len(),
            min,
            max,
            mean,
            by_pieces,
        }
    }
}

/// States sorted by descending value, ties in signature order
pub fn top_states(table: &ValueTable, count: usize) -> Vec<(Signature, f64)> {
    let mut states: Vec<_> = table.iter().map(|(&sig, &value)| (sig, value)).collect();
    states.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    states.truncate(count);
    states
}

/// Whose turn it is on `board`, assuming P1 opened
pub fn player_to_move(board: &Board) -> Player {
    let p1 = board.cells().iter().filter(|&&c| c == Cell::P1).count();
    let p2 = board.cells().iter().filter(|&&c| c == Cell::P2).count();
    if p1 > p2 { Player::P2 } else { Player::P1 }
}

/// Afterstate value of every available move for `player`
pub fn move_values(
    table: &ValueTable,
    board: &Board,
    player: Player,
) -> crate::Result<Vec<(usize, f64)>> {
    board
        .available_positions()
        .into_iter()
        .map(|position| {
            let after = board.with_move(position, player)?;
            Ok((position, table.value_of(&after)))
        })
        .collect()
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let loaded = load_policy(&args.policy, args.board_size)?;
    let table = &loaded.table;
    let n = table.board_size();
    let stats = PolicyStats::from_table(table);

    print_section("Policy");
    print_kv("File", &args.policy.display().to_string());
    print_kv(
        "Format",
        match loaded.format {
            PolicyFormat::Json => "json",
            PolicyFormat::MsgPack => "msgpack",
        },
    );
    if let Some(name) = &loaded.name {
        print_kv("Name", name);
    }
    print_kv("Board", &format!("{n}x{n}"));
    print_kv("States", &format_number(stats.states));
    print_kv(
        "Values",
        &format!(
            "min {:.4}  mean {:.4}  max {:.4}",
            stats.min, stats.mean, stats.max
        ),
    );

    if let Some(metadata) = &loaded.metadata {
        print_subsection("Training");
        print_kv("Rounds", &format_number(metadata.rounds));
        print_kv("Alpha", &metadata.learning_rate.to_string());
        print_kv("Gamma", &metadata.discount.to_string());
        print_kv("Epsilon", &metadata.epsilon.to_string());
        if let Some(seed) = metadata.seed {
            print_kv("Seed", &seed.to_string());
        }
    }

    print_subsection("States by pieces on board");
    for (pieces, count) in &stats.by_pieces {
        print_kv(&pieces.to_string(), &format_number(*count));
    }

    if args.top > 0 && !table.is_empty() {
        print_subsection(&format!("Top {} states", args.top.min(table.len())));
        for (signature, value) in top_states(table, args.top) {
            println!("  {value:.4}  {}", signature.encode(n));
            println!("{}\n", signature.to_board(n));
        }
    }

    if let Some(position) = &args.position {
        let board = Board::parse(position)?;
        if board.size() != n {
            bail!(
                "Position is {0}x{0} but the policy is for {n}x{n} boards",
                board.size()
            );
        }
        let player = player_to_move(&board);
        print_subsection(&format!("Moves for {player}"));
        println!("{board}\n");

        let values = move_values(table, &board, player)?;
        let best = values
            .iter()
            .map(|&(_, value)| value)
            .fold(f64::NEG_INFINITY, f64::max);
        for (position, value) in values {
            let marker = if value == best { "  <- best" } else { "" };
            print_kv(&format!("{}", position + 1), &format!("{value:.4}{marker}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ValueTable {
        let mut table = ValueTable::new(3).unwrap();
        let corner = Board::parse("O.. ... ...").unwrap();
        let center = Board::parse("... .O. ...").unwrap();
        table.set(corner.signature(), 0.25);
        table.set(center.signature(), 0.75);
        table.set(Board::parse("O.. .X. ...").unwrap().signature(), -0.5);
        table
    }

    #[test]
    fn test_stats() {
        let stats = PolicyStats::from_table(&table());
        assert_eq!(stats.states, 3);
        assert_eq!(stats.min, -0.5);
        assert_eq!(stats.max, 0.75);
        assert!((stats.mean - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.by_pieces.get(&1), Some(&2));
        assert_eq!(stats.by_pieces.get(&2), Some(&1));
    }

    #[test]
    fn test_stats_of_empty_table() {
        let stats = PolicyStats::from_table(&ValueTable::new(3).unwrap());
        assert_eq!(stats.states, 0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert!(stats.by_pieces.is_empty());
    }

    #[test]
    fn test_top_states_sorted() {
        let top = top_states(&table(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].1, 0.75);
        assert_eq!(top[1].1, 0.25);
    }

    #[test]
    fn test_move_values_for_player_to_move() {
        let empty = Board::new(3).unwrap();
        assert_eq!(player_to_move(&empty), Player::P1);

        let values = move_values(&table(), &empty, Player::P1).unwrap();
        assert_eq!(values.len(), 9);
        assert_eq!(values[0], (0, 0.25));
        assert_eq!(values[4], (4, 0.75));
        assert_eq!(values[8], (8, 0.0));

        let opened = Board::parse("O.. ... ...").unwrap();
        assert_eq!(player_to_move(&opened), Player::P2);
    }
}
