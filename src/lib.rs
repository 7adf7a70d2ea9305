//! Tabular temporal difference learning for N×N tic-tac-toe
//!
//! This crate provides:
//! - N×N tic-tac-toe rules with symmetry-aware board signatures
//! - A state-value agent trained by self-play with ε-greedy exploration
//! - Interactive play against a trained policy through a pluggable move source
//! - JSON and MessagePack policy persistence
//! - The `tictactoe` command-line front end

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod td_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use types::Signature;
