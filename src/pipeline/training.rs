//! Self-play training loop

use std::{fs::File, io::BufWriter, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::Rewards,
    ports::Observer,
    td_learning::ValueAgent,
    tictactoe::{DEFAULT_BOARD_SIZE, GameOutcome, GameState, Move, Player, board::validate_size},
};

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of self-play rounds
    pub rounds: usize,

    /// Side length of the board
    pub board_size: usize,

    /// Reseeds agent 1 with `seed` and agent 2 with `seed + 1`
    pub seed: Option<u64>,

    /// Terminal rewards
    pub rewards: Rewards,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        validate_size(self.board_size)?;
        if self.rounds == 0 {
            return Err(Error::InvalidConfiguration {
                message: "rounds must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            rounds: 10_000,
            board_size: DEFAULT_BOARD_SIZE,
            seed: None,
            rewards: Rewards::default(),
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Rounds played
    pub rounds: usize,

    pub p1_wins: usize,
    pub p2_wins: usize,
    pub ties: usize,

    pub p1_win_rate: f64,
    pub p2_win_rate: f64,
    pub tie_rate: f64,

    /// Entries in agent 1's value table after training
    pub p1_states: usize,

    /// Entries in agent 2's value table after training
    pub p2_states: usize,
}

impl TrainingResult {
    pub fn new(
        rounds: usize,
        p1_wins: usize,
        p2_wins: usize,
        ties: usize,
        p1_states: usize,
        p2_states: usize,
    ) -> Self {
        let rate = |count: usize| {
            if rounds > 0 {
                count as f64 / rounds as f64
            } else {
                0.0
            }
        };

        Self {
            rounds,
            p1_wins,
            p2_wins,
            ties,
            p1_win_rate: rate(p1_wins),
            p2_win_rate: rate(p2_wins),
            tie_rate: rate(ties),
            p1_states,
            p2_states,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs rounds of agent 1 (P1, moves first) against agent 2 (P2).
///
/// Only the agents' value tables survive from one round to the next.
pub struct SelfPlayTrainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl SelfPlayTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured round and report the tally.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, on an agent built for a different
    /// board size, or on the first error raised by an observer.
    pub fn run(
        &mut self,
        agent1: &mut ValueAgent,
        agent2: &mut ValueAgent,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        for agent in [&*agent1, &*agent2] {
            let found = agent.values().board_size();
            if found != self.config.board_size {
                return Err(Error::BoardSizeMismatch {
                    expected: self.config.board_size,
                    found,
                });
            }
        }

        if let Some(seed) = self.config.seed {
            agent1.set_rng_seed(seed);
            agent2.set_rng_seed(seed.wrapping_add(1));
        }

        info!(
            "training {} vs {} for {} rounds on a {n}x{n} board",
            agent1.name(),
            agent2.name(),
            self.config.rounds,
            n = self.config.board_size,
        );

        for observer in &mut self.observers {
            observer.on_training_start(self.config.rounds)?;
        }

        let mut game = GameState::new(self.config.board_size)?;
        let (mut p1_wins, mut p2_wins, mut ties) = (0, 0, 0);

        for round in 0..self.config.rounds {
            let outcome = self.play_round(round, &mut game, agent1, agent2)?;
            match outcome {
                GameOutcome::Win(Player::P1) => p1_wins += 1,
                GameOutcome::Win(Player::P2) => p2_wins += 1,
                GameOutcome::Tie => ties += 1,
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::new(
            self.config.rounds,
            p1_wins,
            p2_wins,
            ties,
            agent1.values().len(),
            agent2.values().len(),
        );
        info!(
            "training finished: P1 {:.1}% / P2 {:.1}% / tie {:.1}%, {} and {} states",
            result.p1_win_rate * 100.0,
            result.p2_win_rate * 100.0,
            result.tie_rate * 100.0,
            result.p1_states,
            result.p2_states,
        );
        Ok(result)
    }

    /// Play one round to the terminal state, hand out rewards, update both
    /// tables and reset the agents and `game` for the next round.
    pub fn play_round(
        &mut self,
        round: usize,
        game: &mut GameState,
        agent1: &mut ValueAgent,
        agent2: &mut ValueAgent,
    ) -> Result<GameOutcome> {
        for observer in &mut self.observers {
            observer.on_round_start(round)?;
        }

        let mut step = 0;
        let outcome = loop {
            let player = game.current_player();
            let agent = match player {
                Player::P1 => &mut *agent1,
                Player::P2 => &mut *agent2,
            };

            let available = game.available_positions();
            let position = agent.choose_action(&available, game.board(), player)?;
            let status = game.play(position)?;
            agent.add_state(game.board());

            for observer in &mut self.observers {
                observer.on_move(round, step, Move { position, player }, game.board())?;
            }
            step += 1;

            if let Some(outcome) = status.outcome() {
                break outcome;
            }
        };

        let rewards = self.config.rewards;
        agent1.update_after_game(rewards.for_outcome(outcome, Player::P1));
        agent2.update_after_game(rewards.for_outcome(outcome, Player::P2));
        debug!("round {round}: {outcome:?} after {step} moves");

        for observer in &mut self.observers {
            observer.on_round_end(round, outcome, game.board())?;
        }

        agent1.reset();
        agent2.reset();
        game.reset();
        Ok(outcome)
    }
}

/// Train two agents against each other for `rounds` rounds with default
/// rewards.
pub fn train(
    agent1: &mut ValueAgent,
    agent2: &mut ValueAgent,
    board_size: usize,
    rounds: usize,
) -> Result<()> {
    let config = TrainingConfig {
        rounds,
        board_size,
        ..TrainingConfig::default()
    };
    SelfPlayTrainer::new(config).run(agent1, agent2)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;

    fn agents(board_size: usize) -> (ValueAgent, ValueAgent) {
        (
            ValueAgent::new(AgentConfig::new("p1"), board_size).unwrap(),
            ValueAgent::new(AgentConfig::new("p2"), board_size).unwrap(),
        )
    }

    #[test]
    fn test_training_counts_every_round() {
        let config = TrainingConfig {
            rounds: 50,
            seed: Some(42),
            ..TrainingConfig::default()
        };
        let (mut a1, mut a2) = agents(3);

        let result = SelfPlayTrainer::new(config).run(&mut a1, &mut a2).unwrap();

        assert_eq!(result.rounds, 50);
        assert_eq!(result.p1_wins + result.p2_wins + result.ties, 50);
        assert!((result.p1_win_rate + result.p2_win_rate + result.tie_rate - 1.0).abs() < 1e-9);
        assert_eq!(result.p1_states, a1.values().len());
        assert!(a1.trajectory().is_empty());
        assert!(a2.trajectory().is_empty());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = TrainingConfig {
            rounds: 30,
            seed: Some(7),
            ..TrainingConfig::default()
        };
        let (mut a1, mut a2) = agents(3);
        let (mut b1, mut b2) = agents(3);

        let first = SelfPlayTrainer::new(config).run(&mut a1, &mut a2).unwrap();
        let second = SelfPlayTrainer::new(config).run(&mut b1, &mut b2).unwrap();

        assert_eq!(first, second);
        assert_eq!(a1.values(), b1.values());
        assert_eq!(a2.values(), b2.values());
    }

    #[test]
    fn test_rejects_zero_rounds() {
        let config = TrainingConfig {
            rounds: 0,
            ..TrainingConfig::default()
        };
        let (mut a1, mut a2) = agents(3);
        assert!(matches!(
            SelfPlayTrainer::new(config).run(&mut a1, &mut a2),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_agent_with_other_board_size() {
        let (mut a1, _) = agents(3);
        let (_, mut a2) = agents(4);
        assert!(matches!(
            train(&mut a1, &mut a2, 3, 5),
            Err(Error::BoardSizeMismatch {
                expected: 3,
                found: 4
            })
        ));
    }

    #[test]
    fn test_greedy_first_round_is_a_p1_diagonal_win() {
        // With empty tables and ε = 0 both sides take the lowest free cell,
        // so P1 ends up holding 0, 2, 4, 6.
        let config = TrainingConfig {
            rounds: 1,
            ..TrainingConfig::default()
        };
        let greedy = |name: &str| {
            ValueAgent::new(AgentConfig::new(name).with_epsilon(0.0), 3).unwrap()
        };
        let (mut a1, mut a2) = (greedy("p1"), greedy("p2"));

        let result = SelfPlayTrainer::new(config).run(&mut a1, &mut a2).unwrap();
        assert_eq!(result.p1_wins, 1);
    }

    #[test]
    fn test_train_entry_point() {
        let (mut a1, mut a2) = agents(2);
        train(&mut a1, &mut a2, 2, 20).unwrap();
        assert!(!a1.values().is_empty());
        assert!(!a2.values().is_empty());
    }
}
