//! Tabular temporal difference learning over afterstates
//!
//! A [`ValueAgent`] keeps a [`ValueTable`] of board values. During a round it
//! plays ε-greedily over the values of the boards its moves would produce and
//! records the boards it chose. When the round ends the terminal reward is
//! backed up through that trajectory, most recent board first, and every
//! backup is shared across the board's rotations and reflections.
//!
//! ## Usage Example
//!
//! ```
//! use tictactoe_td::{
//!     config::AgentConfig,
//!     td_learning::ValueAgent,
//!     tictactoe::{Board, Player},
//! };
//!
//! let mut agent = ValueAgent::new(AgentConfig::new("p1").with_seed(7), 3)?;
//! let board = Board::new(3)?;
//! let position = agent.choose_action(&board.available_positions(), &board, Player::P1)?;
//! assert!(position < 9);
//! # Ok::<(), tictactoe_td::Error>(())
//! ```

pub mod agent;
pub mod serialization;
pub mod value_table;

pub use agent::{Selection, SelectionKind, ValueAgent};
pub use serialization::{SavedPolicy, TrainingMetadata};
pub use value_table::{FlatPolicy, ValueTable};
