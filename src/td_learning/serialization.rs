//! Serialization support for value tables.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    td_learning::{
        agent::ValueAgent,
        value_table::{FlatPolicy, ValueTable},
    },
};

/// How a saved policy was produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub rounds: usize,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon: f64,
    pub seed: Option<u64>,
}

impl TrainingMetadata {
    pub fn for_agent(agent: &ValueAgent, rounds: usize) -> Self {
        Self {
            rounds,
            learning_rate: agent.learning_rate(),
            discount: agent.discount(),
            epsilon: agent.epsilon(),
            seed: agent.rng_seed(),
        }
    }
}

/// Versioned envelope around a flat policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub version: u32,
    pub board_size: usize,
    pub name: String,
    pub values: FlatPolicy,
    #[serde(default)]
    pub metadata: TrainingMetadata,
}

impl SavedPolicy {
    pub const VERSION: u32 = 1;

    pub fn from_table(name: impl Into<String>, table: &ValueTable) -> Self {
        Self {
            version: Self::VERSION,
            board_size: table.board_size(),
            name: name.into(),
            values: table.to_flat(),
            metadata: TrainingMetadata::default(),
        }
    }

    pub fn from_agent(agent: &ValueAgent, metadata: TrainingMetadata) -> Self {
        Self {
            metadata,
            ..Self::from_table(agent.name(), agent.values())
        }
    }

    /// Rebuild the table, checking version and board size first.
    pub fn to_table(&self, expected_board_size: usize) -> Result<ValueTable> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        if self.board_size != expected_board_size {
            return Err(Error::BoardSizeMismatch {
                expected: expected_board_size,
                found: self.board_size,
            });
        }
        ValueTable::from_flat(self.board_size, &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AgentConfig,
        tictactoe::{Board, Player},
    };

    fn trained_agent() -> ValueAgent {
        let mut agent =
            ValueAgent::new(AgentConfig::new("p1").with_seed(3), 3).expect("valid agent");
        let mut board = Board::new(3).unwrap();
        board.apply_move(0, Player::P1).unwrap();
        agent.add_state(&board);
        board.apply_move(4, Player::P2).unwrap();
        board.apply_move(1, Player::P1).unwrap();
        agent.add_state(&board);
        agent.update_after_game(1.0);
        agent
    }

    #[test]
    fn test_msgpack_roundtrip() -> Result<()> {
        let agent = trained_agent();
        let saved = SavedPolicy::from_agent(&agent, TrainingMetadata::for_agent(&agent, 1));
        let bytes = rmp_serde::to_vec(&saved).expect("encode");
        let loaded: SavedPolicy = rmp_serde::from_slice(&bytes).expect("decode");

        assert_eq!(loaded.name, "p1");
        assert_eq!(loaded.metadata.rounds, 1);
        assert_eq!(loaded.metadata.seed, Some(3));
        assert_eq!(&loaded.to_table(3)?, agent.values());
        Ok(())
    }

    #[test]
    fn test_rejects_future_version() {
        let agent = trained_agent();
        let mut saved = SavedPolicy::from_table("p1", agent.values());
        saved.version = 99;
        assert!(matches!(
            saved.to_table(3),
            Err(Error::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_rejects_board_size_mismatch() {
        let agent = trained_agent();
        let saved = SavedPolicy::from_table("p1", agent.values());
        assert!(matches!(
            saved.to_table(4),
            Err(Error::BoardSizeMismatch {
                expected: 4,
                found: 3
            })
        ));
    }
}
