//! CLI infrastructure for training and playing against value agents
//!
//! This module provides the command-line interface for self-play training,
//! interactive play and policy inspection.

pub mod commands;
pub mod output;
pub mod storage;
