//! Configuration types for agents and training runs.

use std::{fs::File, io::BufReader, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    pipeline::TrainingConfig,
    tictactoe::{DEFAULT_BOARD_SIZE, GameOutcome, Player},
};

/// Hyperparameters for a value agent.
///
/// # Examples
///
/// ```
/// use tictactoe_td::config::AgentConfig;
///
/// let config = AgentConfig::new("p1")
///     .with_learning_rate(0.2)
///     .with_epsilon(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Name used for logging and default policy file names
    pub name: String,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount: f64,
    /// Exploration rate ε
    pub epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.2;
    pub const DEFAULT_DISCOUNT: f64 = 0.9;
    pub const DEFAULT_EPSILON: f64 = 0.3;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            discount: Self::DEFAULT_DISCOUNT,
            epsilon: Self::DEFAULT_EPSILON,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that α, γ and ε all lie in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("learning rate", self.learning_rate),
            ("discount", self.discount),
            ("epsilon", self.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "{label} for agent '{}' must be in [0, 1], got {value}",
                        self.name
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new("agent")
    }
}

/// Terminal rewards handed to each side at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
}

impl Rewards {
    /// Reward for `player` given how the game ended
    pub fn for_outcome(&self, outcome: GameOutcome, player: Player) -> f64 {
        match outcome {
            GameOutcome::Win(winner) if winner == player => self.win,
            GameOutcome::Win(_) => self.loss,
            GameOutcome::Tie => self.tie,
        }
    }
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            win: 1.0,
            tie: 0.5,
            loss: 0.0,
        }
    }
}

impl FromStr for Rewards {
    type Err = Error;

    /// Parse `win=1,tie=0.5,loss=0`. Missing keys keep their defaults and
    /// `draw` is accepted for `tie`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidConfiguration { message };
        let mut rewards = Rewards::default();

        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (key, value) = trimmed
                .split_once('=')
                .ok_or_else(|| invalid(format!("reward entry '{trimmed}' is not key=value")))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| invalid(format!("reward value '{value}' is not a number")))?;
            if !value.is_finite() {
                return Err(invalid(format!("reward value for '{key}' must be finite")));
            }
            match key.trim().to_ascii_lowercase().as_str() {
                "win" => rewards.win = value,
                "tie" | "draw" => rewards.tie = value,
                "loss" => rewards.loss = value,
                other => {
                    return Err(invalid(format!(
                        "unknown reward key '{other}' (expected win, tie or loss)"
                    )));
                }
            }
        }

        Ok(rewards)
    }
}

/// Whole training run as read from a JSON config file.
///
/// Every field is optional in the file; omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub board_size: usize,
    pub rounds: usize,
    pub seed: Option<u64>,
    pub rewards: Rewards,
    pub agent1: AgentConfig,
    pub agent2: AgentConfig,
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        crate::tictactoe::board::validate_size(self.board_size)?;
        self.agent1.validate()?;
        self.agent2.validate()
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            rounds: self.rounds,
            board_size: self.board_size,
            seed: self.seed,
            rewards: self.rewards,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            rounds: TrainingConfig::default().rounds,
            seed: None,
            rewards: Rewards::default(),
            agent1: AgentConfig::new("p1"),
            agent2: AgentConfig::new("p2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_hyperparameters() {
        let config = AgentConfig::default();
        assert_eq!(config.learning_rate, 0.2);
        assert_eq!(config.discount, 0.9);
        assert_eq!(config.epsilon, 0.3);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(AgentConfig::default().with_epsilon(1.5).validate().is_err());
        assert!(AgentConfig::default().with_discount(-0.1).validate().is_err());
        assert!(
            AgentConfig::default()
                .with_learning_rate(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(AgentConfig::default().with_epsilon(0.0).validate().is_ok());
    }

    #[test]
    fn test_rewards_for_outcome() {
        let rewards = Rewards::default();
        let p1_win = GameOutcome::Win(Player::P1);
        assert_eq!(rewards.for_outcome(p1_win, Player::P1), 1.0);
        assert_eq!(rewards.for_outcome(p1_win, Player::P2), 0.0);
        assert_eq!(rewards.for_outcome(GameOutcome::Tie, Player::P1), 0.5);
        assert_eq!(rewards.for_outcome(GameOutcome::Tie, Player::P2), 0.5);
    }

    #[test]
    fn test_parse_rewards() {
        let rewards: Rewards = "win=2, draw=0.25".parse().unwrap();
        assert_eq!(rewards.win, 2.0);
        assert_eq!(rewards.tie, 0.25);
        assert_eq!(rewards.loss, 0.0);

        assert!("win".parse::<Rewards>().is_err());
        assert!("win=abc".parse::<Rewards>().is_err());
        assert!("bonus=1".parse::<Rewards>().is_err());
    }

    #[test]
    fn test_run_config_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"rounds": 25, "agent1": {{"epsilon": 0.1}}}}"#).unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.rounds, 25);
        assert_eq!(config.board_size, 3);
        assert_eq!(config.agent1.epsilon, 0.1);
        assert_eq!(config.agent1.learning_rate, 0.2);
        assert_eq!(config.agent2.epsilon, 0.3);
    }

    #[test]
    fn test_run_config_rejects_bad_board_size() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"board_size": 12}}"#).unwrap();
        assert!(matches!(
            RunConfig::load(file.path()),
            Err(Error::InvalidBoardSize { size: 12 })
        ));
    }
}
