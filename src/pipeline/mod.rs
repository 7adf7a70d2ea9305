//! Training and play pipelines
//!
//! This module provides:
//! - Self-play training of two value agents
//! - Interactive play of a trained agent against a move source
//! - Observers recording what happens during training

pub mod observers;
pub mod play;
pub mod training;

pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, MoveObservation, ProgressObserver,
    RoundObservation,
};
pub use play::{PlaySession, Scoreboard};
pub use training::{SelfPlayTrainer, TrainingConfig, TrainingResult, train};

pub use crate::ports::Observer;
