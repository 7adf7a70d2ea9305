//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Observer,
    tictactoe::{Board, GameOutcome, Move, Player},
};

fn outcome_label(outcome: GameOutcome) -> &'static str {
    match outcome {
        GameOutcome::Win(Player::P1) => "P1",
        GameOutcome::Win(Player::P2) => "P2",
        GameOutcome::Tie => "tie",
    }
}

/// Lets the caller keep a handle on an observer after boxing a clone of it
/// into a trainer.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_rounds: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_start(total_rounds)
    }

    fn on_round_start(&mut self, round: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_round_start(round)
    }

    fn on_move(&mut self, round: usize, step: usize, mv: Move, board: &Board) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_move(round, step, mv, board)
    }

    fn on_round_end(&mut self, round: usize, outcome: GameOutcome, board: &Board) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_round_end(round, outcome, board)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_training_end()
    }
}

/// Observation of a single move during a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveObservation {
    /// Move number within the round
    pub step: usize,
    pub player: Player,
    pub position: usize,
    /// Board after the move, as a persistence key
    pub board: String,
}

/// Complete observation of a training round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundObservation {
    pub round: usize,
    /// `P1`, `P2` or `tie`
    pub outcome: String,
    pub moves: Vec<MoveObservation>,
    pub total_moves: usize,
}

/// Progress bar observer - Shows training progress
#[derive(Default)]
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    p1_wins: usize,
    ties: usize,
    p2_wins: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn message(&self) -> String {
        format!("{} T:{} P2:{}", self.p1_wins, self.ties, self.p2_wins)
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_rounds: usize) -> Result<()> {
        let pb = ProgressBar::new(total_rounds as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds (P1:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_round_end(&mut self, round: usize, outcome: GameOutcome, _board: &Board) -> Result<()> {
        match outcome {
            GameOutcome::Win(Player::P1) => self.p1_wins += 1,
            GameOutcome::Win(Player::P2) => self.p2_wins += 1,
            GameOutcome::Tie => self.ties += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(round as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_rounds: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub ties: usize,
    pub p1_win_rate: f64,
    pub p2_win_rate: f64,
    pub tie_rate: f64,
    pub avg_round_length: f64,
}

/// Metrics observer - Tracks outcome rates and round lengths
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    p1_wins: usize,
    p2_wins: usize,
    ties: usize,
    total_rounds: usize,
    move_counts: Vec<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            count as f64 / self.total_rounds as f64
        }
    }

    pub fn p1_win_rate(&self) -> f64 {
        self.rate(self.p1_wins)
    }

    pub fn p2_win_rate(&self) -> f64 {
        self.rate(self.p2_wins)
    }

    pub fn tie_rate(&self) -> f64 {
        self.rate(self.ties)
    }

    /// Average number of moves per round
    pub fn avg_round_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_rounds: self.total_rounds,
            p1_wins: self.p1_wins,
            p2_wins: self.p2_wins,
            ties: self.ties,
            p1_win_rate: self.p1_win_rate(),
            p2_win_rate: self.p2_win_rate(),
            tie_rate: self.tie_rate(),
            avg_round_length: self.avg_round_length(),
        }
    }
}

impl Observer for MetricsObserver {
    fn on_round_start(&mut self, _round: usize) -> Result<()> {
        self.move_counts.push(0);
        Ok(())
    }

    fn on_move(&mut self, _round: usize, _step: usize, _mv: Move, _board: &Board) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_round_end(&mut self, _round: usize, outcome: GameOutcome, _board: &Board) -> Result<()> {
        self.total_rounds += 1;
        match outcome {
            GameOutcome::Win(Player::P1) => self.p1_wins += 1,
            GameOutcome::Win(Player::P2) => self.p2_wins += 1,
            GameOutcome::Tie => self.ties += 1,
        }
        Ok(())
    }
}

/// JSONL observer - Exports one [`RoundObservation`] per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_moves: Vec<MoveObservation>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_moves: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_round_start(&mut self, _round: usize) -> Result<()> {
        self.current_moves.clear();
        Ok(())
    }

    fn on_move(&mut self, _round: usize, step: usize, mv: Move, board: &Board) -> Result<()> {
        self.current_moves.push(MoveObservation {
            step,
            player: mv.player,
            position: mv.position,
            board: board.signature().encode(board.size()),
        });
        Ok(())
    }

    fn on_round_end(&mut self, round: usize, outcome: GameOutcome, _board: &Board) -> Result<()> {
        let moves = std::mem::take(&mut self.current_moves);
        let observation = RoundObservation {
            round,
            outcome: outcome_label(outcome).to_string(),
            total_moves: moves.len(),
            moves,
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
