//! Epsilon-greedy value agent
//!
//! The agent scores each candidate move by the value of the board it would
//! produce (the afterstate) and records the afterstates it visits so the
//! table can be backed up once the round ends.

use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    config::AgentConfig,
    td_learning::value_table::ValueTable,
    tictactoe::{Board, Player},
    types::Signature,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Which branch of the epsilon-greedy rule produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Explore,
    Exploit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub position: usize,
    pub kind: SelectionKind,
}

/// Tabular state-value agent.
///
/// Owns its value table exclusively; the trajectory never outlives a round.
#[derive(Debug, Clone)]
pub struct ValueAgent {
    name: String,
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
    values: ValueTable,
    trajectory: Vec<Signature>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl ValueAgent {
    /// Create an agent with an empty table for `board_size` boards
    ///
    /// # Errors
    ///
    /// Fails if the hyperparameters are out of range or the board size is
    /// unsupported.
    pub fn new(config: AgentConfig, board_size: usize) -> Result<Self> {
        let values = ValueTable::new(board_size)?;
        Self::with_values(config, values)
    }

    /// Create an agent around an existing (e.g. loaded) table
    pub fn with_values(config: AgentConfig, values: ValueTable) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: config.name,
            learning_rate: config.learning_rate,
            discount: config.discount,
            epsilon: config.epsilon,
            values,
            trajectory: Vec::new(),
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Change the exploration rate; `0.0` freezes the policy into pure greed.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon must be in [0, 1], got {epsilon}"),
            });
        }
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Swap in a different table, e.g. one loaded from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoardSizeMismatch`] if the table was built for another
    /// board size.
    pub fn replace_values(&mut self, values: ValueTable) -> Result<()> {
        if values.board_size() != self.values.board_size() {
            return Err(Error::BoardSizeMismatch {
                expected: self.values.board_size(),
                found: values.board_size(),
            });
        }
        self.values = values;
        Ok(())
    }

    /// Afterstates recorded this round, oldest first
    pub fn trajectory(&self) -> &[Signature] {
        &self.trajectory
    }

    /// Pick a position for `symbol` on `board`
    pub fn choose_action(
        &mut self,
        available_positions: &[usize],
        board: &Board,
        symbol: Player,
    ) -> Result<usize> {
        self.select_action(available_positions, board, symbol)
            .map(|selection| selection.position)
    }

    /// ε-greedy selection, reporting which branch was taken.
    ///
    /// The exploit branch keeps the first position with the highest afterstate
    /// value in `available_positions` order. With ε = 0 no random number is
    /// drawn.
    pub fn select_action(
        &mut self,
        available_positions: &[usize],
        board: &Board,
        symbol: Player,
    ) -> Result<Selection> {
        if available_positions.is_empty() {
            return Err(Error::EmptyActionSet);
        }

        let explore = self.epsilon > 0.0 && self.rng.random::<f64>() < self.epsilon;
        let selection = if explore {
            let position = *available_positions
                .choose(&mut self.rng)
                .ok_or(Error::EmptyActionSet)?;
            Selection {
                position,
                kind: SelectionKind::Explore,
            }
        } else {
            Selection {
                position: self.greedy_position(available_positions, board, symbol)?,
                kind: SelectionKind::Exploit,
            }
        };

        trace!(
            "{} picked {} ({:?}) from {:?}",
            self.name, selection.position, selection.kind, available_positions
        );
        Ok(selection)
    }

    fn greedy_position(
        &self,
        available_positions: &[usize],
        board: &Board,
        symbol: Player,
    ) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &position in available_positions {
            let value = self.values.value_of(&board.with_move(position, symbol)?);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((position, value));
            }
        }
        best.map(|(position, _)| position)
            .ok_or(Error::EmptyActionSet)
    }

    /// Append the board's signature to this round's trajectory
    pub fn add_state(&mut self, board: &Board) {
        self.trajectory.push(board.signature());
    }

    /// Back up the terminal reward through this round's trajectory
    pub fn update_after_game(&mut self, reward: f64) {
        self.values.update_after_game(
            &self.trajectory,
            reward,
            self.learning_rate,
            self.discount,
        );
    }

    /// Clear the trajectory at a round boundary
    pub fn reset(&mut self) {
        self.trajectory.clear();
    }
}
