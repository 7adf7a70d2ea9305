//! Subcommands of the `tictactoe` binary

pub mod inspect;
pub mod play;
pub mod train;
