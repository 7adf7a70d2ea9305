//! Winning line analysis for N×N boards

use super::{Cell, Player};

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Every full line of an N×N board: rows, then columns, then the main
    /// diagonal and the anti-diagonal.
    pub fn lines(size: usize) -> Vec<Vec<usize>> {
        let rows = (0..size).map(|r| (0..size).map(|c| r * size + c).collect::<Vec<_>>());
        let cols = (0..size).map(|c| (0..size).map(|r| r * size + c).collect::<Vec<_>>());
        let main = (0..size).map(|i| i * size + i).collect::<Vec<_>>();
        let anti = (0..size).map(|i| i * size + (size - 1 - i)).collect::<Vec<_>>();
        rows.chain(cols).chain([main, anti]).collect()
    }

    /// Owner of the first uniform, non-empty line in [`Self::lines`] order.
    pub fn winner(cells: &[Cell], size: usize) -> Option<Player> {
        Self::lines(size)
            .iter()
            .find_map(|line| Self::line_owner(cells, line))
    }

    fn line_owner(cells: &[Cell], line: &[usize]) -> Option<Player> {
        let first = cells[*line.first()?];
        let owner = first.to_player()?;
        line.iter().all(|&idx| cells[idx] == first).then_some(owner)
    }
}
