//! Ports (trait boundaries) for external collaborators.
//!
//! The core only talks to the outside world through these traits: a move
//! source supplies positions during interactive play, a repository persists
//! value tables, and observers watch training. Adapters live in
//! [`crate::adapters`] and [`crate::pipeline::observers`].

pub mod move_source;
pub mod observer;
pub mod repository;

pub use move_source::MoveSource;
pub use observer::Observer;
pub use repository::PolicyRepository;
