//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;
pub mod scripted_move_source;
pub mod stdin_move_source;

pub use in_memory_repository::InMemoryPolicyRepository;
pub use json_repository::{JsonPolicyRepository, default_policy_path};
pub use msgpack_repository::MsgPackPolicyRepository;
pub use scripted_move_source::ScriptedMoveSource;
pub use stdin_move_source::StdinMoveSource;
